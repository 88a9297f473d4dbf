//! Circuit breaker configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::ports::CircuitBreakerConfig;

/// Thresholds for the AI health monitor
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// Consecutive errors that put the engine into degraded mode
    #[serde(default = "default_degrade_after")]
    pub degrade_after_consecutive_errors: u32,

    /// Consecutive errors from which each further error shrinks the batch size
    #[serde(default = "default_shrink_after")]
    pub shrink_batch_after_consecutive_errors: u32,

    /// Minimum time in degraded mode, in seconds
    #[serde(default = "default_cooldown")]
    pub recovery_cooldown_secs: u64,

    /// Capacity of the sliding outcome window
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    #[serde(default = "default_batch_size")]
    pub max_batch_size: usize,

    #[serde(default = "default_batch_size")]
    pub initial_batch_size: usize,
}

impl HealthConfig {
    pub fn to_breaker_config(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            degrade_threshold: self.degrade_after_consecutive_errors,
            shrink_batch_threshold: self.shrink_batch_after_consecutive_errors,
            recovery_cooldown: Duration::from_secs(self.recovery_cooldown_secs),
            window_size: self.window_size,
            max_batch_size: self.max_batch_size,
            initial_batch_size: self.initial_batch_size,
        }
    }

    /// Validate health thresholds
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.degrade_after_consecutive_errors == 0 {
            return Err(ValidationError::MissingRequired(
                "HEALTH__DEGRADE_AFTER_CONSECUTIVE_ERRORS",
            ));
        }
        if self.window_size == 0 {
            return Err(ValidationError::InvalidWindowSize);
        }
        if self.initial_batch_size == 0 || self.initial_batch_size > self.max_batch_size {
            return Err(ValidationError::InvalidBatchSize);
        }
        Ok(())
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            degrade_after_consecutive_errors: default_degrade_after(),
            shrink_batch_after_consecutive_errors: default_shrink_after(),
            recovery_cooldown_secs: default_cooldown(),
            window_size: default_window_size(),
            max_batch_size: default_batch_size(),
            initial_batch_size: default_batch_size(),
        }
    }
}

fn default_degrade_after() -> u32 {
    5
}

fn default_shrink_after() -> u32 {
    3
}

fn default_cooldown() -> u64 {
    300
}

fn default_window_size() -> usize {
    100
}

fn default_batch_size() -> usize {
    5
}
