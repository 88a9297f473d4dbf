//! Disabled AI Provider - Stands in when no analysis endpoint is configured.
//!
//! Every request is refused with a non-retryable `InvalidRequest`, so a
//! caller that reaches it anyway fails fast into traditional scoring instead
//! of burning retries.

use async_trait::async_trait;
use tracing::warn;

use crate::ports::{AIError, AIProvider, AnalysisRequest, AnalysisResponse, ProviderInfo};

/// Provider used when AI analysis is switched off.
#[derive(Debug, Clone, Default)]
pub struct DisabledProvider;

impl DisabledProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AIProvider for DisabledProvider {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AIError> {
        warn!(
            request_id = %request.request_id,
            analysis_type = %request.analysis_type,
            "AI analysis requested with no endpoint configured"
        );
        Err(AIError::InvalidRequest(
            "no AI analysis endpoint configured".to_string(),
        ))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("disabled", "none")
    }
}
