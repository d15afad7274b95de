use super::RankingStore;
use crate::error::StoreResult;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis_utils::SharedConnectionManager;
use std::collections::HashMap;
use tracing::debug;

/// Redis-backed store sharing one connection manager.
#[derive(Clone)]
pub struct RedisStore {
    redis: SharedConnectionManager,
}

impl RedisStore {
    pub fn new(redis: SharedConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl RankingStore for RedisStore {
    async fn incr(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let mut conn = self.redis.lock().await;
        let value: i64 = conn.incr(key, delta).await?;
        Ok(value)
    }

    async fn sadd(&self, key: &str, member: &str) -> StoreResult<i64> {
        let mut conn = self.redis.lock().await;
        let added: i64 = conn.sadd(key, member).await?;
        Ok(added)
    }

    async fn expire(&self, key: &str, seconds: u64) -> StoreResult<bool> {
        let mut conn = self.redis.lock().await;
        let applied: bool = redis::cmd("EXPIRE")
            .arg(key)
            .arg(seconds)
            .query_async(&mut *conn)
            .await?;
        Ok(applied)
    }

    async fn hset_multiple(&self, key: &str, fields: &[(&str, String)]) -> StoreResult<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let mut conn = self.redis.lock().await;
        let _: () = conn.hset_multiple(key, fields).await?;
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let mut conn = self.redis.lock().await;
        let fields: HashMap<String, String> = conn.hgetall(key).await?;
        Ok(fields)
    }

    async fn hincr(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        let mut conn = self.redis.lock().await;
        let value: i64 = conn.hincr(key, field, delta).await?;
        Ok(value)
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> StoreResult<()> {
        let mut conn = self.redis.lock().await;
        let _: () = conn.zadd(key, member, score).await?;
        Ok(())
    }

    async fn zincr(&self, key: &str, member: &str, delta: f64) -> StoreResult<f64> {
        let mut conn = self.redis.lock().await;
        let score: f64 = conn.zincr(key, member, delta).await?;
        Ok(score)
    }

    async fn zscore(&self, key: &str, member: &str) -> StoreResult<Option<f64>> {
        let mut conn = self.redis.lock().await;
        let score: Option<f64> = conn.zscore(key, member).await?;
        Ok(score)
    }

    async fn zrevrange(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>> {
        let mut conn = self.redis.lock().await;
        let members: Vec<String> = conn.zrevrange(key, start, stop).await?;
        Ok(members)
    }

    async fn zinterstore_max(&self, dest: &str, keys: &[&str]) -> StoreResult<i64> {
        let mut conn = self.redis.lock().await;
        let count: i64 = redis::cmd("ZINTERSTORE")
            .arg(dest)
            .arg(keys.len())
            .arg(keys)
            .arg("AGGREGATE")
            .arg("MAX")
            .query_async(&mut *conn)
            .await?;

        debug!(dest = %dest, sources = ?keys, count, "ZINTERSTORE");
        Ok(count)
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.redis.lock().await;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.redis.lock().await;
        redis::cmd("PING")
            .query_async::<_, String>(&mut *conn)
            .await?;
        Ok(())
    }
}
