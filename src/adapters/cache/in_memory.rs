//! In-Memory Result Cache Adapter
//!
//! TTL map of compatibility results. Expired entries are treated as misses
//! and dropped on access; every write also sweeps whatever else has expired,
//! so pairs that are never looked up again do not accumulate. Suitable for a
//! single process and for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::domain::compatibility::CompatibilityResult;
use crate::ports::{CacheError, ResultCache};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CompatibilityResult,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

fn sweep(entries: &mut HashMap<String, CacheEntry>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now));
    before - entries.len()
}

/// In-memory result cache with per-entry expiry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResultCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl InMemoryResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drops every expired entry.
    pub async fn purge_expired(&self) -> usize {
        sweep(&mut *self.entries.write().await, Instant::now())
    }
}

#[async_trait]
impl ResultCache for InMemoryResultCache {
    async fn get(&self, key: &str) -> Result<Option<CompatibilityResult>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: evict
        self.entries.write().await.remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &CompatibilityResult, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let entry = CacheEntry {
            value: value.clone(),
            expires_at: now + ttl,
        };
        let mut entries = self.entries.write().await;
        sweep(&mut entries, now);
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.entries.write().await.clear();
        Ok(())
    }
}
