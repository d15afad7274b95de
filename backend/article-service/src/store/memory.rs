//! In-process store for tests and local runs
//!
//! Mirrors the Redis semantics the ranking operations rely on: lazy TTL
//! expiry, set members scoring 1 in intersections, empty intersections
//! removing the destination, and reverse ranges breaking score ties by
//! member in descending order. Expiry uses `tokio::time::Instant`, so a
//! paused test runtime controls it.

use super::RankingStore;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

enum Value {
    Str(String),
    Set(HashSet<String>),
    Hash(HashMap<String, String>),
    SortedSet(HashMap<String, f64>),
}

struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining time to live, `None` when the key is missing or persistent.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        live(&mut entries, key, now)
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }
}

/// Look up a key, evicting it first if its TTL has elapsed.
fn live<'a>(
    entries: &'a mut HashMap<String, Entry>,
    key: &str,
    now: Instant,
) -> Option<&'a mut Entry> {
    if entries.get(key).map(|e| e.is_expired(now)).unwrap_or(false) {
        entries.remove(key);
    }
    entries.get_mut(key)
}

fn live_or_insert<'a>(
    entries: &'a mut HashMap<String, Entry>,
    key: &str,
    init: impl FnOnce() -> Value,
) -> &'a mut Entry {
    if entries
        .get(key)
        .map(|e| e.is_expired(Instant::now()))
        .unwrap_or(false)
    {
        entries.remove(key);
    }
    entries
        .entry(key.to_string())
        .or_insert_with(|| Entry::new(init()))
}

fn wrong_type(key: &str) -> StoreError {
    StoreError::WrongType(key.to_string())
}

fn parse_int(raw: &str) -> StoreResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| StoreError::InvalidData("value is not an integer or out of range".into()))
}

/// Resolve Redis-style inclusive rank bounds (negatives count from the end).
fn rank_bounds(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl RankingStore for MemoryStore {
    async fn incr(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let mut entries = self.entries.lock().await;
        let entry = live_or_insert(&mut entries, key, || Value::Str("0".into()));
        match &mut entry.value {
            Value::Str(raw) => {
                let next = parse_int(raw)? + delta;
                *raw = next.to_string();
                Ok(next)
            }
            _ => Err(wrong_type(key)),
        }
    }

    async fn sadd(&self, key: &str, member: &str) -> StoreResult<i64> {
        let mut entries = self.entries.lock().await;
        let entry = live_or_insert(&mut entries, key, || Value::Set(HashSet::new()));
        match &mut entry.value {
            Value::Set(members) => Ok(i64::from(members.insert(member.to_string()))),
            _ => Err(wrong_type(key)),
        }
    }

    async fn expire(&self, key: &str, seconds: u64) -> StoreResult<bool> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        match live(&mut entries, key, now) {
            Some(entry) => {
                entry.expires_at = Some(now + Duration::from_secs(seconds));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn hset_multiple(&self, key: &str, fields: &[(&str, String)]) -> StoreResult<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let mut entries = self.entries.lock().await;
        let entry = live_or_insert(&mut entries, key, || Value::Hash(HashMap::new()));
        match &mut entry.value {
            Value::Hash(hash) => {
                for (field, value) in fields {
                    hash.insert((*field).to_string(), value.clone());
                }
                Ok(())
            }
            _ => Err(wrong_type(key)),
        }
    }

    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let mut entries = self.entries.lock().await;
        match live(&mut entries, key, Instant::now()) {
            None => Ok(HashMap::new()),
            Some(Entry {
                value: Value::Hash(hash),
                ..
            }) => Ok(hash.clone()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn hincr(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        let mut entries = self.entries.lock().await;
        let entry = live_or_insert(&mut entries, key, || Value::Hash(HashMap::new()));
        match &mut entry.value {
            Value::Hash(hash) => {
                let current = match hash.get(field) {
                    Some(raw) => parse_int(raw)?,
                    None => 0,
                };
                let next = current + delta;
                hash.insert(field.to_string(), next.to_string());
                Ok(next)
            }
            _ => Err(wrong_type(key)),
        }
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;
        let entry = live_or_insert(&mut entries, key, || Value::SortedSet(HashMap::new()));
        match &mut entry.value {
            Value::SortedSet(scores) => {
                scores.insert(member.to_string(), score);
                Ok(())
            }
            _ => Err(wrong_type(key)),
        }
    }

    async fn zincr(&self, key: &str, member: &str, delta: f64) -> StoreResult<f64> {
        let mut entries = self.entries.lock().await;
        let entry = live_or_insert(&mut entries, key, || Value::SortedSet(HashMap::new()));
        match &mut entry.value {
            Value::SortedSet(scores) => {
                let score = scores.entry(member.to_string()).or_insert(0.0);
                *score += delta;
                Ok(*score)
            }
            _ => Err(wrong_type(key)),
        }
    }

    async fn zscore(&self, key: &str, member: &str) -> StoreResult<Option<f64>> {
        let mut entries = self.entries.lock().await;
        match live(&mut entries, key, Instant::now()) {
            None => Ok(None),
            Some(Entry {
                value: Value::SortedSet(scores),
                ..
            }) => Ok(scores.get(member).copied()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn zrevrange(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>> {
        let mut entries = self.entries.lock().await;
        let scores = match live(&mut entries, key, Instant::now()) {
            None => return Ok(Vec::new()),
            Some(Entry {
                value: Value::SortedSet(scores),
                ..
            }) => scores,
            Some(_) => return Err(wrong_type(key)),
        };

        let mut ranked: Vec<(&String, f64)> = scores.iter().map(|(m, s)| (m, *s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(a.0)));

        Ok(match rank_bounds(ranked.len(), start, stop) {
            Some((from, to)) => ranked[from..=to]
                .iter()
                .map(|(member, _)| (*member).clone())
                .collect(),
            None => Vec::new(),
        })
    }

    async fn zinterstore_max(&self, dest: &str, keys: &[&str]) -> StoreResult<i64> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let mut sources: Vec<HashMap<String, f64>> = Vec::with_capacity(keys.len());
        for key in keys {
            let scores = match live(&mut entries, key, now) {
                None => HashMap::new(),
                Some(Entry {
                    value: Value::SortedSet(scores),
                    ..
                }) => scores.clone(),
                Some(Entry {
                    value: Value::Set(members),
                    ..
                }) => members.iter().map(|m| (m.clone(), 1.0)).collect(),
                Some(_) => return Err(wrong_type(key)),
            };
            sources.push(scores);
        }

        let mut result: HashMap<String, f64> = HashMap::new();
        if let Some((first, rest)) = sources.split_first() {
            for (member, score) in first {
                let mut best = *score;
                let in_all = rest.iter().all(|other| match other.get(member) {
                    Some(s) => {
                        best = best.max(*s);
                        true
                    }
                    None => false,
                });
                if in_all {
                    result.insert(member.clone(), best);
                }
            }
        }

        entries.remove(dest);
        let count = result.len() as i64;
        if count > 0 {
            entries.insert(dest.to_string(), Entry::new(Value::SortedSet(result)));
        }
        Ok(count)
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let mut entries = self.entries.lock().await;
        Ok(live(&mut entries, key, Instant::now()).is_some())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_bounds() {
        assert_eq!(rank_bounds(10, 0, 24), Some((0, 9)));
        assert_eq!(rank_bounds(10, 25, 49), None);
        assert_eq!(rank_bounds(10, -3, -1), Some((7, 9)));
        assert_eq!(rank_bounds(0, 0, 24), None);
        assert_eq!(rank_bounds(5, 3, 2), None);
    }

    #[tokio::test]
    async fn test_zrevrange_orders_ties_by_member_desc() {
        let store = MemoryStore::new();
        store.zadd("z", "a", 1.0).await.unwrap();
        store.zadd("z", "b", 1.0).await.unwrap();
        store.zadd("z", "c", 5.0).await.unwrap();

        let members = store.zrevrange("z", 0, -1).await.unwrap();
        assert_eq!(members, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_sadd_reports_new_members_only() {
        let store = MemoryStore::new();
        assert_eq!(store.sadd("s", "alice").await.unwrap(), 1);
        assert_eq!(store.sadd("s", "alice").await.unwrap(), 0);
        assert_eq!(store.sadd("s", "bob").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_wrong_type() {
        let store = MemoryStore::new();
        store.sadd("s", "alice").await.unwrap();

        assert!(matches!(
            store.zadd("s", "x", 1.0).await,
            Err(StoreError::WrongType(_))
        ));
        assert!(matches!(store.hgetall("s").await, Err(StoreError::WrongType(_))));
    }

    #[tokio::test]
    async fn test_hincr_rejects_non_integer() {
        let store = MemoryStore::new();
        store
            .hset_multiple("h", &[("votes", "many".to_string())])
            .await
            .unwrap();

        assert!(matches!(
            store.hincr("h", "votes", 1).await,
            Err(StoreError::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn test_zinterstore_max_with_plain_set() {
        let store = MemoryStore::new();
        store.sadd("group:g", "article:1").await.unwrap();
        store.sadd("group:g", "article:3").await.unwrap();
        store.zadd("score:", "article:1", 100.0).await.unwrap();
        store.zadd("score:", "article:2", 200.0).await.unwrap();
        store.zadd("score:", "article:3", 0.5).await.unwrap();

        let count = store
            .zinterstore_max("score:g", &["group:g", "score:"])
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(store.zscore("score:g", "article:1").await.unwrap(), Some(100.0));
        // set members count as 1, which beats the lower sorted-set score
        assert_eq!(store.zscore("score:g", "article:3").await.unwrap(), Some(1.0));
        assert_eq!(store.zscore("score:g", "article:2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_intersection_removes_destination() {
        let store = MemoryStore::new();
        store.zadd("dest", "stale", 1.0).await.unwrap();
        store.zadd("score:", "article:1", 1.0).await.unwrap();

        let count = store
            .zinterstore_max("dest", &["group:missing", "score:"])
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert!(!store.exists("dest").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expire_evicts_after_ttl() {
        let store = MemoryStore::new();
        store.sadd("voted:1", "alice").await.unwrap();
        assert!(store.expire("voted:1", 60).await.unwrap());
        assert!(!store.expire("voted:missing", 60).await.unwrap());

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(store.exists("voted:1").await.unwrap());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!store.exists("voted:1").await.unwrap());
        // a fresh SADD recreates the set without a TTL
        assert_eq!(store.sadd("voted:1", "alice").await.unwrap(), 1);
        assert_eq!(store.ttl("voted:1").await, None);
    }
}
