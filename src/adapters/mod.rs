//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the matching core to external systems:
//! - `ai` - Analysis endpoint (HTTP), a disabled stand-in and a scripted mock
//! - `cache` - Result caches (in-memory, Redis)
//! - `members` - Member stores (in-memory, JSON file)
//! - `weights` - Weight sources (JSON/YAML file)

pub mod ai;
pub mod cache;
pub mod members;
pub mod weights;

pub use ai::{DisabledProvider, HttpAnalysisProvider, HttpProviderConfig, MockAIProvider, MockError};
pub use cache::{InMemoryResultCache, RedisResultCache};
pub use members::{InMemoryMemberStore, JsonFileMemberStore};
pub use weights::FileWeightSource;
