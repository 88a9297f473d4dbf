//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid AI endpoint URL format")]
    InvalidEndpointUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("max_attempts must be at least 1")]
    InvalidMaxAttempts,

    #[error("base_backoff_ms exceeds max_backoff_ms")]
    InvalidBackoff,

    #[error("{0} must lie in [0, 1]")]
    ThresholdOutOfRange(&'static str),

    #[error("initial_batch_size must lie in [1, max_batch_size]")]
    InvalidBatchSize,

    #[error("window_size must be at least 1")]
    InvalidWindowSize,

    #[error("max_results must be at least 1")]
    InvalidMaxResults,

    #[error("Invalid weight override: {0}")]
    InvalidWeights(#[from] crate::domain::foundation::ValidationError),
}
