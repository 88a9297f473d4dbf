//! AI Provider Port - Interface for the external analysis endpoint.
//!
//! This port abstracts the single call the matching engine makes to an AI
//! backend: a system prompt, a JSON-encoded user prompt and the kind of
//! analysis requested. The provider returns the raw textual payload; parsing
//! and sanitising it is the analysis pipeline's job.
//!
//! # Design
//!
//! - One non-streaming request per analysis
//! - Provider-agnostic request/response types
//! - Error types distinguish retryable transport conditions from fatal ones
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct FixedProvider;
//!
//! #[async_trait]
//! impl AIProvider for FixedProvider {
//!     async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AIError> {
//!         Ok(AnalysisResponse::new(r#"{"confidence_score": 0.9}"#))
//!     }
//!     // ... other methods
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Port for AI analysis calls.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Run one analysis request.
    ///
    /// Implementations perform exactly one attempt; retries and backoff are
    /// the caller's responsibility.
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AIError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// The three analyses the backend performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisType {
    #[serde(rename = "personality")]
    Personality,
    #[serde(rename = "implicit")]
    Implicit,
    #[serde(rename = "deep-compatibility")]
    DeepCompatibility,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Personality => "personality",
            AnalysisType::Implicit => "implicit",
            AnalysisType::DeepCompatibility => "deep-compatibility",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request for one AI analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Instruction guiding the model.
    pub system_prompt: String,
    /// Structured member/book data, serialised as a JSON string.
    pub user_prompt: String,
    /// Which analysis schema the response must follow.
    pub analysis_type: AnalysisType,
    /// Correlation id for tracing.
    pub request_id: String,
}

impl AnalysisRequest {
    /// Creates a request with a fresh request id.
    pub fn new(
        analysis_type: AnalysisType,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            analysis_type,
            request_id: format!("{}-{}", analysis_type, uuid::Uuid::new_v4()),
        }
    }

    /// Overrides the request id.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }
}

/// Raw response from the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResponse {
    /// Payload expected to hold one JSON object.
    pub content: String,
    /// Model that produced the response, when reported.
    pub model: Option<String>,
}

impl AnalysisResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "http", "mock").
    pub name: String,
    /// Model identifier forwarded to the backend.
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// AI provider errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider (HTTP 429).
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed, 0 if not reported.
        retry_after_secs: u32,
    },

    /// Provider is unavailable (5xx).
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key rejected (401/403). Retried like any other non-2xx status.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error or unexpected non-2xx status.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to read the provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl AIError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::AuthenticationFailed
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}
