//! Member store and weight source configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::weights::WeightConfigPatch;

/// Member records location
#[derive(Debug, Clone, Deserialize)]
pub struct MembersConfig {
    /// JSON file holding every member record
    #[serde(default = "default_members_path")]
    pub path: PathBuf,
}

impl Default for MembersConfig {
    fn default() -> Self {
        Self {
            path: default_members_path(),
        }
    }
}

fn default_members_path() -> PathBuf {
    PathBuf::from("./data/members.json")
}

/// Weight overrides and live reloading
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    /// Groups applied over the defaults at startup
    #[serde(default)]
    pub overrides: WeightConfigPatch,

    /// JSON or YAML weight document polled for live updates
    pub source_path: Option<PathBuf>,

    /// Seconds between polls of `source_path`
    #[serde(default = "default_refresh")]
    pub refresh_secs: u64,
}

impl WeightsConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    /// Validate overrides with the same rules the weight store applies
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.overrides.validate()?;
        if self.source_path.is_some() && self.refresh_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            overrides: WeightConfigPatch::default(),
            source_path: None,
            refresh_secs: default_refresh(),
        }
    }
}

fn default_refresh() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weights::{smart, WeightGroup, WeightGroupName};

    #[test]
    fn test_members_default_path() {
        assert_eq!(
            MembersConfig::default().path,
            PathBuf::from("./data/members.json")
        );
    }

    #[test]
    fn test_empty_overrides_are_valid() {
        assert!(WeightsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_override_sum() {
        let config = WeightsConfig {
            overrides: WeightConfigPatch::single(
                WeightGroupName::Smart,
                WeightGroup::from_pairs([(smart::SIMILARITY, 0.9), (smart::COMPLEMENTARITY, 0.9)]),
            ),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_source_requires_interval() {
        let config = WeightsConfig {
            source_path: Some(PathBuf::from("weights.yaml")),
            refresh_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
