//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Scripted mock for testing
//! - `HttpAnalysisProvider` - JSON analysis endpoint with bearer-token auth
//! - `DisabledProvider` - Refuses every request when no endpoint is configured

mod disabled_provider;
mod http_provider;
mod mock_provider;

pub use disabled_provider::DisabledProvider;
pub use http_provider::{HttpAnalysisProvider, HttpProviderConfig};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
