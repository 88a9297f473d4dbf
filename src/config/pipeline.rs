//! AI analysis retry configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::PipelineConfig;

/// Retry and gating settings for the deep analysis pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// Attempts per analysis, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff after the first failed attempt, in milliseconds
    #[serde(default = "default_base_backoff")]
    pub base_backoff_ms: u64,

    /// Ceiling for any backoff, in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,

    /// Minimum personality confidence on both sides for a deep analysis
    #[serde(default = "default_threshold")]
    pub deep_confidence_threshold: f64,
}

impl PipelineSettings {
    /// Pipeline configuration with the given per-attempt timeout
    pub fn to_pipeline_config(&self, attempt_timeout: Duration) -> PipelineConfig {
        PipelineConfig {
            max_attempts: self.max_attempts,
            base_backoff: Duration::from_millis(self.base_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            attempt_timeout,
            deep_confidence_threshold: self.deep_confidence_threshold,
        }
    }

    /// Validate pipeline settings
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidMaxAttempts);
        }
        if self.base_backoff_ms > self.max_backoff_ms {
            return Err(ValidationError::InvalidBackoff);
        }
        if !(0.0..=1.0).contains(&self.deep_confidence_threshold) {
            return Err(ValidationError::ThresholdOutOfRange(
                "deep_confidence_threshold",
            ));
        }
        Ok(())
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff(),
            max_backoff_ms: default_max_backoff(),
            deep_confidence_threshold: default_threshold(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_backoff() -> u64 {
    1000
}

fn default_max_backoff() -> u64 {
    5000
}

fn default_threshold() -> f64 {
    0.3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_defaults() {
        let settings = PipelineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(
            settings.to_pipeline_config(Duration::from_secs(30)),
            PipelineConfig::default()
        );
    }

    #[test]
    fn test_validation_zero_attempts() {
        let settings = PipelineSettings {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidMaxAttempts)
        ));
    }

    #[test]
    fn test_validation_inverted_backoff() {
        let settings = PipelineSettings {
            base_backoff_ms: 6000,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(ValidationError::InvalidBackoff)));
    }

    #[test]
    fn test_validation_threshold_range() {
        let settings = PipelineSettings {
            deep_confidence_threshold: 1.5,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
