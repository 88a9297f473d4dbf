//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `READING_MATCH` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a working
//! traditional-only setup.
//!
//! # Example
//!
//! ```no_run
//! use reading_match::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("AI scoring enabled: {}", config.ai.is_configured());
//! ```

mod ai;
mod cache;
mod error;
mod health;
mod logging;
mod matching;
mod members;
mod pipeline;

pub use ai::AiConfig;
pub use cache::{CacheBackend, CacheConfig};
pub use error::{ConfigError, ValidationError};
pub use health::HealthConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use matching::MatchingConfig;
pub use members::{MembersConfig, WeightsConfig};
pub use pipeline::PipelineSettings;

use serde::Deserialize;

use crate::application::PipelineConfig;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// AI analysis endpoint
    #[serde(default)]
    pub ai: AiConfig,

    /// Retry and gating for AI analyses
    #[serde(default)]
    pub pipeline: PipelineSettings,

    /// Circuit breaker thresholds
    #[serde(default)]
    pub health: HealthConfig,

    /// Scoring and match selection
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Result cache backend
    #[serde(default)]
    pub cache: CacheConfig,

    /// Member records
    #[serde(default)]
    pub members: MembersConfig,

    /// Weight overrides and live reloading
    #[serde(default)]
    pub weights: WeightsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `READING_MATCH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `READING_MATCH__AI__ENDPOINT_URL=...` -> `ai.endpoint_url = ...`
    /// - `READING_MATCH__WEIGHTS__OVERRIDES__AI__SEMANTIC=0.5` -> `weights.overrides.ai.semantic = 0.5`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("READING_MATCH")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.pipeline.validate()?;
        self.health.validate()?;
        self.matching.validate()?;
        self.cache.validate()?;
        self.weights.validate()?;
        Ok(())
    }

    /// Pipeline configuration using the AI request timeout per attempt
    pub fn pipeline_config(&self) -> PipelineConfig {
        self.pipeline.to_pipeline_config(self.ai.request_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AnalysisDepth;
    use crate::domain::weights::ai;
    use std::env;
    use std::sync::Mutex;
    use std::time::Duration;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "READING_MATCH__AI__ENDPOINT_URL",
        "READING_MATCH__AI__API_KEY",
        "READING_MATCH__AI__REQUEST_TIMEOUT_SECS",
        "READING_MATCH__MATCHING__DEPTH",
        "READING_MATCH__MATCHING__MAX_RESULTS",
        "READING_MATCH__CACHE__BACKEND",
        "READING_MATCH__WEIGHTS__OVERRIDES__AI__TRADITIONAL",
        "READING_MATCH__WEIGHTS__OVERRIDES__AI__SEMANTIC",
        "READING_MATCH__LOGGING__FORMAT",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(!config.ai.is_configured());
        assert_eq!(config.matching.max_results, 10);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("READING_MATCH__AI__ENDPOINT_URL", "https://ai.example.org/analyze");
        env::set_var("READING_MATCH__AI__API_KEY", "secret");
        env::set_var("READING_MATCH__AI__REQUEST_TIMEOUT_SECS", "12");
        env::set_var("READING_MATCH__MATCHING__DEPTH", "standard");
        env::set_var("READING_MATCH__MATCHING__MAX_RESULTS", "5");
        env::set_var("READING_MATCH__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.ai.is_configured());
        assert_eq!(config.matching.depth, AnalysisDepth::Standard);
        assert_eq!(config.matching.max_results, 5);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.pipeline_config().attempt_timeout, Duration::from_secs(12));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_weight_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("READING_MATCH__WEIGHTS__OVERRIDES__AI__TRADITIONAL", "0.5");
        env::set_var("READING_MATCH__WEIGHTS__OVERRIDES__AI__SEMANTIC", "0.5");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        let group = config.weights.overrides.ai.as_ref().unwrap();
        assert_eq!(group.weight(ai::SEMANTIC), 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("READING_MATCH__CACHE__BACKEND", "redis");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }
}
