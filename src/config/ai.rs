//! AI endpoint configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::HttpProviderConfig;

/// AI analysis endpoint configuration
///
/// AI scoring is optional: without an endpoint the engine runs the
/// traditional path only.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Analysis endpoint URL
    pub endpoint_url: Option<String>,

    /// Bearer token for the endpoint
    pub api_key: Option<Secret<String>>,

    /// Model hint forwarded with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-attempt timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl AiConfig {
    /// Get the per-attempt timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check if an endpoint is configured
    pub fn is_configured(&self) -> bool {
        self.endpoint_url.as_ref().is_some_and(|u| !u.is_empty())
    }

    /// Provider configuration, if an endpoint and key are present
    pub fn provider_config(&self) -> Option<HttpProviderConfig> {
        let url = self.endpoint_url.as_ref().filter(|u| !u.is_empty())?;
        let key = self.api_key.clone()?;
        Some(
            HttpProviderConfig::new(url.clone(), key)
                .with_model(self.model.clone())
                .with_timeout(self.request_timeout()),
        )
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        if let Some(url) = self.endpoint_url.as_deref().filter(|u| !u.is_empty()) {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidEndpointUrl);
            }
            if self.api_key.is_none() {
                return Err(ValidationError::MissingRequired("AI__API_KEY"));
            }
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            api_key: None,
            model: default_model(),
            request_timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "default".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> Option<Secret<String>> {
        Some(Secret::new("key".to_string()))
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.model, "default");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            request_timeout_secs: 12,
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(12));
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = AiConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidTimeout)));
    }

    #[test]
    fn test_validation_endpoint_without_key() {
        let config = AiConfig {
            endpoint_url: Some("https://ai.example.org/analyze".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_validation_invalid_url() {
        let config = AiConfig {
            endpoint_url: Some("ftp://ai.example.org".to_string()),
            api_key: key(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidEndpointUrl)
        ));
    }

    #[test]
    fn test_provider_config_built_when_complete() {
        let config = AiConfig {
            endpoint_url: Some("https://ai.example.org/analyze".to_string()),
            api_key: key(),
            model: "reader-1".to_string(),
            request_timeout_secs: 10,
        };
        assert!(config.validate().is_ok());

        let provider = config.provider_config().unwrap();
        assert_eq!(provider.endpoint_url, "https://ai.example.org/analyze");
        assert_eq!(provider.model, "reader-1");
        assert_eq!(provider.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_provider_config_absent_without_endpoint() {
        let config = AiConfig {
            api_key: key(),
            ..Default::default()
        };
        assert!(config.provider_config().is_none());
    }
}
