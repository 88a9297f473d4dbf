//! Redis-backed result cache for multi-process deployments.
//!
//! Values are stored as JSON strings with `SET ... EX`. Keys are namespaced
//! with a prefix so `clear` can remove only this cache's entries using
//! `SCAN MATCH <prefix>*` followed by `DEL`.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::domain::compatibility::CompatibilityResult;
use crate::ports::{CacheError, ResultCache};

/// Keys deleted per `DEL` during `clear`.
const CLEAR_CHUNK: usize = 500;

/// Redis-backed compatibility result cache.
#[derive(Clone)]
pub struct RedisResultCache {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisResultCache {
    /// Create a cache over an established connection.
    pub fn new(conn: MultiplexedConnection, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Connect to `redis_url` and create a cache.
    pub async fn connect(redis_url: &str, key_prefix: impl Into<String>) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url).map_err(unavailable)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(unavailable)?;
        Ok(Self::new(conn, key_prefix))
    }

    fn redis_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

fn unavailable(e: redis::RedisError) -> CacheError {
    CacheError::Unavailable(e.to_string())
}

/// Redis rejects `EX 0`, so sub-second TTLs round up to one second.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl ResultCache for RedisResultCache {
    async fn get(&self, key: &str) -> Result<Option<CompatibilityResult>, CacheError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.redis_key(key)).await.map_err(unavailable)?;

        raw.map(|json| {
            serde_json::from_str(&json).map_err(|e| CacheError::DeserializationFailed(e.to_string()))
        })
        .transpose()
    }

    async fn set(&self, key: &str, value: &CompatibilityResult, ttl: Duration) -> Result<(), CacheError> {
        let json =
            serde_json::to_string(value).map_err(|e| CacheError::SerializationFailed(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(self.redis_key(key), json, ttl_secs(ttl))
            .await
            .map_err(unavailable)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.redis_key(key)).await.map_err(unavailable)
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let pattern = format!("{}*", self.key_prefix);
        let mut conn = self.conn.clone();

        let keys: Vec<String> = {
            let mut iter = conn
                .scan_match::<_, String>(&pattern)
                .await
                .map_err(unavailable)?;
            let mut keys = Vec::new();
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
            keys
        };

        let mut conn = self.conn.clone();
        for chunk in keys.chunks(CLEAR_CHUNK) {
            conn.del::<_, ()>(chunk).await.map_err(unavailable)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_never_rounds_to_zero() {
        assert_eq!(ttl_secs(Duration::from_millis(10)), 1);
        assert_eq!(ttl_secs(Duration::from_secs(600)), 600);
    }
}
