//! Result Cache Port - Key/value store for computed compatibility results.
//!
//! Keys are opaque strings produced by the engine. Values are stored as
//! serialised [`CompatibilityResult`]s and expire after the given TTL.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::compatibility::CompatibilityResult;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to serialize cached value: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize cached value: {0}")]
    DeserializationFailed(String),
}

/// Port for the compatibility result cache.
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Returns the cached value, or `None` on miss or expiry.
    async fn get(&self, key: &str) -> Result<Option<CompatibilityResult>, CacheError>;

    /// Stores a value that expires after `ttl`.
    async fn set(&self, key: &str, value: &CompatibilityResult, ttl: Duration) -> Result<(), CacheError>;

    /// Removes one entry.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Removes every entry owned by this cache.
    async fn clear(&self) -> Result<(), CacheError>;
}
