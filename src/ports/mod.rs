//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the matching core and its collaborators. Adapters implement these ports.
//!
//! ## Backend Ports
//!
//! - `AIProvider` - One-shot call to the AI analysis endpoint
//! - `CircuitBreaker` - Health gate in front of the AI backend
//!
//! ## Collaborator Ports
//!
//! - `ResultCache` - TTL cache for compatibility results
//! - `MemberStore` - Member record loading
//! - `WeightSource` - Weight dictionaries from configuration

mod ai_provider;
mod circuit_breaker;
mod member_store;
mod result_cache;
mod weight_source;

pub use ai_provider::{
    AIError, AIProvider, AnalysisRequest, AnalysisResponse, AnalysisType, ProviderInfo,
};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState, HealthSnapshot};
pub use member_store::{MemberStore, MemberStoreError};
pub use result_cache::{CacheError, ResultCache};
pub use weight_source::{WeightSource, WeightSourceError};
