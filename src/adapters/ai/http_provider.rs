//! HTTP Analysis Provider - Implementation of AIProvider over a JSON endpoint.
//!
//! Sends one `POST` per analysis with bearer-token authentication:
//!
//! ```json
//! { "systemPrompt": "...", "userPrompt": "{...}", "analysisType": "personality", "model": "..." }
//! ```
//!
//! The endpoint may answer with the analysis object itself, or wrap it as
//! `{ "content": "<json string>" }` or `{ "result": { ... } }`.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpProviderConfig::new("https://ai.example.org/analyze", api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let provider = HttpAnalysisProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::ports::{AIError, AIProvider, AnalysisRequest, AnalysisResponse, ProviderInfo};

/// Configuration for the HTTP provider.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Analysis endpoint URL.
    pub endpoint_url: String,
    /// Bearer token.
    api_key: Secret<String>,
    /// Model hint forwarded to the endpoint.
    pub model: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpProviderConfig {
    /// Creates a new configuration with the given endpoint and API key.
    pub fn new(endpoint_url: impl Into<String>, api_key: Secret<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            api_key,
            model: "default".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the model hint.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Wire format of the request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    system_prompt: &'a str,
    user_prompt: &'a str,
    analysis_type: &'a str,
    model: &'a str,
}

/// HTTP analysis provider.
pub struct HttpAnalysisProvider {
    config: HttpProviderConfig,
    client: Client,
}

impl HttpAnalysisProvider {
    /// Creates a provider; fails only if the HTTP client cannot be built.
    pub fn new(config: HttpProviderConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    async fn send_request(&self, request: &AnalysisRequest) -> Result<Response, AIError> {
        let body = WireRequest {
            system_prompt: &request.system_prompt,
            user_prompt: &request.user_prompt,
            analysis_type: request.analysis_type.as_str(),
            model: &self.config.model,
        };

        self.client
            .post(&self.config.endpoint_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("X-Request-Id", &request.request_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Maps non-2xx statuses onto provider errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let retry_after_header = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok());
        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(
                retry_after_header.unwrap_or_else(|| parse_retry_after(&error_body)),
            )),
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }
}

/// Reads `"retry_after": <secs>` from a JSON error body; 0 if absent.
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<Value>(error_body)
        .ok()
        .and_then(|v| {
            v.get("retry_after")
                .or_else(|| v.get("error").and_then(|e| e.get("retry_after")))
                .and_then(Value::as_u64)
        })
        .and_then(|secs| u32::try_from(secs).ok())
        .unwrap_or(0)
}

/// Unwraps the `content` / `result` envelopes; any other body is returned
/// unchanged for the pipeline to validate.
fn unwrap_envelope(body: String) -> String {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&body) else {
        return body;
    };

    match (map.get("content"), map.get("result")) {
        (Some(Value::String(content)), _) => content.clone(),
        (_, Some(result @ Value::Object(_))) => result.to_string(),
        _ => body,
    }
}

#[async_trait]
impl AIProvider for HttpAnalysisProvider {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AIError> {
        let response = self.send_request(&request).await?;
        let response = self.handle_response_status(response).await?;

        let body = response
            .text()
            .await
            .map_err(|e| AIError::network(format!("Failed to read response body: {}", e)))?;

        debug!(
            request_id = %request.request_id,
            analysis_type = %request.analysis_type,
            bytes = body.len(),
            "AI endpoint responded"
        );

        Ok(AnalysisResponse::new(unwrap_envelope(body)).with_model(self.config.model.clone()))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("http", self.config.model.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HttpProviderConfig {
        HttpProviderConfig::new("https://ai.example.org/analyze", Secret::new("test-key".to_string()))
    }

    #[test]
    fn config_builder_works() {
        let config = config()
            .with_model("reader-model")
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.model, "reader-model");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn api_key_is_not_debug_printed() {
        let printed = format!("{:?}", config());
        assert!(!printed.contains("test-key"));
    }

    #[test]
    fn provider_info_reports_model() {
        let provider = HttpAnalysisProvider::new(config().with_model("m-1")).unwrap();
        let info = provider.provider_info();
        assert_eq!(info.name, "http");
        assert_eq!(info.model, "m-1");
    }

    #[test]
    fn wire_request_uses_camel_case() {
        let body = WireRequest {
            system_prompt: "s",
            user_prompt: "{}",
            analysis_type: "implicit",
            model: "m",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["systemPrompt"], "s");
        assert_eq!(json["userPrompt"], "{}");
        assert_eq!(json["analysisType"], "implicit");
    }

    #[test]
    fn unwraps_content_envelope() {
        let body = r#"{"content": "{\"confidence_score\": 0.4}"}"#.to_string();
        assert_eq!(unwrap_envelope(body), r#"{"confidence_score": 0.4}"#);
    }

    #[test]
    fn unwraps_result_envelope() {
        let body = r#"{"result": {"compatibility_score": 0.5}}"#.to_string();
        let unwrapped: Value = serde_json::from_str(&unwrap_envelope(body)).unwrap();
        assert_eq!(unwrapped["compatibility_score"], 0.5);
    }

    #[test]
    fn raw_objects_and_garbage_pass_through() {
        let raw = r#"{"confidence_score": 0.9}"#.to_string();
        assert_eq!(unwrap_envelope(raw.clone()), raw);
        assert_eq!(unwrap_envelope("oops".to_string()), "oops");
    }

    #[test]
    fn parse_retry_after_from_body() {
        assert_eq!(parse_retry_after(r#"{"retry_after": 12}"#), 12);
        assert_eq!(parse_retry_after(r#"{"error": {"retry_after": 3}}"#), 3);
        assert_eq!(parse_retry_after("Too many requests"), 0);
    }
}
