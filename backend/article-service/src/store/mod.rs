//! Key-value store abstraction
//!
//! The service never holds state of its own: every index, counter and
//! expiry lives in the store behind this trait. Only the primitives the
//! ranking operations need are exposed.

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use crate::error::StoreResult;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait RankingStore: Send + Sync {
    /// INCRBY, returning the new value
    async fn incr(&self, key: &str, delta: i64) -> StoreResult<i64>;

    /// SADD, returning the number of members actually added
    async fn sadd(&self, key: &str, member: &str) -> StoreResult<i64>;

    /// EXPIRE, returning false when the key does not exist
    async fn expire(&self, key: &str, seconds: u64) -> StoreResult<bool>;

    /// HSET with several field/value pairs
    async fn hset_multiple(&self, key: &str, fields: &[(&str, String)]) -> StoreResult<()>;

    /// HGETALL; empty map when the key is missing
    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>>;

    /// HINCRBY, returning the new value
    async fn hincr(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64>;

    /// ZADD a single member
    async fn zadd(&self, key: &str, member: &str, score: f64) -> StoreResult<()>;

    /// ZINCRBY, returning the new score
    async fn zincr(&self, key: &str, member: &str, delta: f64) -> StoreResult<f64>;

    /// ZSCORE
    async fn zscore(&self, key: &str, member: &str) -> StoreResult<Option<f64>>;

    /// ZREVRANGE by rank, inclusive on both ends
    async fn zrevrange(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>>;

    /// ZINTERSTORE with AGGREGATE MAX, returning the destination cardinality
    async fn zinterstore_max(&self, dest: &str, keys: &[&str]) -> StoreResult<i64>;

    /// EXISTS
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Liveness probe
    async fn ping(&self) -> StoreResult<()>;
}
