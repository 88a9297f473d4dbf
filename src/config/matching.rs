//! Scoring and match selection configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::{AnalysisDepth, BatchDelays, EngineConfig, SelectorConfig};
use crate::domain::compatibility::CacheKeyStrategy;

/// Engine and selector settings
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// Result cache TTL in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Maximum matches returned per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// How much AI analysis the AI path runs
    #[serde(default)]
    pub depth: AnalysisDepth,

    /// How cache keys identify a pair
    #[serde(default)]
    pub cache_key: CacheKeyStrategy,

    /// Pause between batches for `similar` searches, in milliseconds
    #[serde(default = "default_similar_delay")]
    pub similar_delay_ms: u64,

    /// Pause between batches for `complementary` searches, in milliseconds
    #[serde(default = "default_complementary_delay")]
    pub complementary_delay_ms: u64,

    /// Pause between batches for `smart` searches, in milliseconds
    #[serde(default = "default_smart_delay")]
    pub smart_delay_ms: u64,
}

impl MatchingConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            cache_key: self.cache_key,
            depth: self.depth,
        }
    }

    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig {
            max_results: self.max_results,
            batch_delays: BatchDelays {
                similar: Duration::from_millis(self.similar_delay_ms),
                complementary: Duration::from_millis(self.complementary_delay_ms),
                smart: Duration::from_millis(self.smart_delay_ms),
            },
        }
    }

    /// Validate matching settings
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_results == 0 {
            return Err(ValidationError::InvalidMaxResults);
        }
        if self.cache_ttl_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl(),
            max_results: default_max_results(),
            depth: AnalysisDepth::default(),
            cache_key: CacheKeyStrategy::default(),
            similar_delay_ms: default_similar_delay(),
            complementary_delay_ms: default_complementary_delay(),
            smart_delay_ms: default_smart_delay(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    600
}

fn default_max_results() -> usize {
    10
}

fn default_similar_delay() -> u64 {
    100
}

fn default_complementary_delay() -> u64 {
    120
}

fn default_smart_delay() -> u64 {
    150
}
