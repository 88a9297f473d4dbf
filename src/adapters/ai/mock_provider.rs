//! Mock AI Provider for testing.
//!
//! Provides a scripted implementation of the AIProvider port, allowing tests
//! to run without calling a real analysis endpoint.
//!
//! # Features
//!
//! - One response queue per analysis type, plus a shared fallback queue
//! - Default responses per analysis type once a queue is drained
//! - Simulated delays for timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response(AnalysisType::Personality, r#"{"confidence_score": 0.9}"#)
//!     .with_error(AnalysisType::Personality, MockError::RateLimited { retry_after_secs: 1 });
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AIError, AIProvider, AnalysisRequest, AnalysisResponse, AnalysisType, ProviderInfo};

/// Mock AI provider for testing.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    inner: Arc<Mutex<MockState>>,
    info: ProviderInfo,
    delay: Duration,
}

#[derive(Debug, Default)]
struct MockState {
    /// Scripted responses per analysis type (consumed in order).
    scripted: HashMap<AnalysisType, VecDeque<MockResponse>>,
    /// Returned when a type's queue is empty.
    defaults: HashMap<AnalysisType, MockResponse>,
    /// Call history for verification.
    calls: Vec<AnalysisRequest>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this payload.
    Success(String),
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate rate limiting (HTTP 429).
    RateLimited { retry_after_secs: u32 },
    /// Simulate provider unavailable (5xx).
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
    /// Simulate a request the provider refuses outright.
    InvalidRequest { message: String },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
            MockError::InvalidRequest { message } => AIError::InvalidRequest(message),
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a mock whose unscripted calls return an empty JSON object.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState::default())),
            info: ProviderInfo::new("mock", "mock-analysis-1"),
            delay: Duration::ZERO,
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a successful payload for one analysis type.
    pub fn with_response(self, analysis_type: AnalysisType, content: impl Into<String>) -> Self {
        self.push(analysis_type, MockResponse::Success(content.into()));
        self
    }

    /// Queues an error for one analysis type.
    pub fn with_error(self, analysis_type: AnalysisType, error: MockError) -> Self {
        self.push(analysis_type, MockResponse::Error(error));
        self
    }

    /// Queues the same error `times` times.
    pub fn with_repeated_error(self, analysis_type: AnalysisType, error: MockError, times: usize) -> Self {
        for _ in 0..times {
            self.push(analysis_type, MockResponse::Error(error.clone()));
        }
        self
    }

    /// Payload returned for an analysis type once its queue is drained.
    pub fn with_default_response(self, analysis_type: AnalysisType, content: impl Into<String>) -> Self {
        self.state()
            .defaults
            .insert(analysis_type, MockResponse::Success(content.into()));
        self
    }

    /// Error returned for an analysis type once its queue is drained.
    pub fn with_default_error(self, analysis_type: AnalysisType, error: MockError) -> Self {
        self.state()
            .defaults
            .insert(analysis_type, MockResponse::Error(error));
        self
    }

    /// Error returned for every analysis type once its queue is drained.
    pub fn failing_with(self, error: MockError) -> Self {
        {
            let mut state = self.state();
            for t in [
                AnalysisType::Personality,
                AnalysisType::Implicit,
                AnalysisType::DeepCompatibility,
            ] {
                state.defaults.insert(t, MockResponse::Error(error.clone()));
            }
        }
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Returns the number of calls made for one analysis type.
    pub fn call_count_for(&self, analysis_type: AnalysisType) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.analysis_type == analysis_type)
            .count()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<AnalysisRequest> {
        self.state().calls.clone()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    fn push(&self, analysis_type: AnalysisType, response: MockResponse) {
        self.state()
            .scripted
            .entry(analysis_type)
            .or_default()
            .push_back(response);
    }

    fn next_response(&self, analysis_type: AnalysisType) -> MockResponse {
        let mut state = self.state();
        if let Some(response) = state
            .scripted
            .get_mut(&analysis_type)
            .and_then(VecDeque::pop_front)
        {
            return response;
        }
        state
            .defaults
            .get(&analysis_type)
            .cloned()
            .unwrap_or_else(|| MockResponse::Success("{}".to_string()))
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AIError> {
        let analysis_type = request.analysis_type;
        self.state().calls.push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response(analysis_type) {
            MockResponse::Success(content) => {
                Ok(AnalysisResponse::new(content).with_model(self.info.model.clone()))
            }
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(t: AnalysisType) -> AnalysisRequest {
        AnalysisRequest::new(t, "system", "{}")
    }

    #[tokio::test]
    async fn queues_are_per_analysis_type() {
        let provider = MockAIProvider::new()
            .with_response(AnalysisType::Personality, "{\"p\":1}")
            .with_response(AnalysisType::Implicit, "{\"i\":1}");

        let implicit = provider.analyze(request(AnalysisType::Implicit)).await.unwrap();
        let personality = provider.analyze(request(AnalysisType::Personality)).await.unwrap();

        assert_eq!(implicit.content, "{\"i\":1}");
        assert_eq!(personality.content, "{\"p\":1}");
    }

    #[tokio::test]
    async fn drained_queue_falls_back_to_default() {
        let provider = MockAIProvider::new()
            .with_response(AnalysisType::Personality, "{\"first\":true}")
            .with_default_response(AnalysisType::Personality, "{\"default\":true}");

        provider.analyze(request(AnalysisType::Personality)).await.unwrap();
        let second = provider.analyze(request(AnalysisType::Personality)).await.unwrap();
        assert_eq!(second.content, "{\"default\":true}");

        let unscripted = provider.analyze(request(AnalysisType::Implicit)).await.unwrap();
        assert_eq!(unscripted.content, "{}");
    }

    #[tokio::test]
    async fn injects_errors_and_records_calls() {
        let provider = MockAIProvider::new().with_repeated_error(
            AnalysisType::DeepCompatibility,
            MockError::RateLimited { retry_after_secs: 2 },
            2,
        );

        for _ in 0..2 {
            let err = provider
                .analyze(request(AnalysisType::DeepCompatibility))
                .await
                .unwrap_err();
            assert_eq!(err, AIError::rate_limited(2));
        }

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.call_count_for(AnalysisType::DeepCompatibility), 2);
        assert_eq!(provider.call_count_for(AnalysisType::Personality), 0);

        provider.clear_calls();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn failing_with_applies_to_every_type() {
        let provider = MockAIProvider::new().failing_with(MockError::AuthenticationFailed);
        let err = provider.analyze(request(AnalysisType::Implicit)).await.unwrap_err();
        assert_eq!(err, AIError::AuthenticationFailed);
    }
}
