//! Result cache adapters.
//!
//! - `InMemoryResultCache` - TTL map for a single process and tests
//! - `RedisResultCache` - Shared cache for multi-process deployments

mod in_memory;
mod redis;

pub use self::redis::RedisResultCache;
pub use in_memory::InMemoryResultCache;
