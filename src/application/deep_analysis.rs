//! DeepAnalysisPipeline - Retried, validated calls to the AI analysis endpoint.
//!
//! Every analysis follows the same protocol:
//!
//! 1. Build a deterministic request payload
//! 2. Call the provider up to `max_attempts` times with exponential backoff
//! 3. Retry rate limits, network failures and timeouts; stop immediately on
//!    a malformed payload or a non-retryable provider error
//! 4. Sanitise the payload into its domain type
//! 5. Report every attempt outcome to the circuit breaker
//!
//! Running out of attempts is not an error: the neutral default profile is
//! returned instead.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::domain::analysis::{
    deep_compatibility_request, extract_json_object, implicit_request, normalize_deep,
    normalize_implicit, normalize_personality, personality_request, DeepCompatibilityResult,
    ImplicitPreferenceProfile, PersonalityProfile,
};
use crate::domain::member::MemberProfile;
use crate::ports::{AIError, AIProvider, AnalysisRequest, AnalysisType, CircuitBreaker};

/// Errors that abort an analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The AI answered with something that is not a JSON object. Never retried.
    #[error("{analysis_type} analysis returned a malformed payload: {reason}")]
    Parsing {
        analysis_type: AnalysisType,
        reason: String,
    },

    /// The provider failed in a way retrying cannot fix.
    #[error("{analysis_type} analysis failed: {source}")]
    Provider {
        analysis_type: AnalysisType,
        #[source]
        source: AIError,
    },
}

/// Retry and gating parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Total attempts per analysis, including the first.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_backoff: Duration,
    /// Ceiling for any single delay.
    pub max_backoff: Duration,
    /// Wall-clock limit for a single attempt.
    pub attempt_timeout: Duration,
    /// Minimum personality confidence on both sides for a deep analysis.
    pub deep_confidence_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(1000),
            max_backoff: Duration::from_millis(5000),
            attempt_timeout: Duration::from_secs(30),
            deep_confidence_threshold: 0.3,
        }
    }
}

impl PipelineConfig {
    /// Delay after failed attempt `attempt` (1-based):
    /// `min(base * 2^(attempt-1), max)`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }

    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }
}

/// Pipeline that runs the three AI analyses.
pub struct DeepAnalysisPipeline {
    provider: Arc<dyn AIProvider>,
    breaker: Arc<dyn CircuitBreaker>,
    config: PipelineConfig,
}

impl DeepAnalysisPipeline {
    pub fn new(provider: Arc<dyn AIProvider>, breaker: Arc<dyn CircuitBreaker>) -> Self {
        Self::with_config(provider, breaker, PipelineConfig::default())
    }

    pub fn with_config(
        provider: Arc<dyn AIProvider>,
        breaker: Arc<dyn CircuitBreaker>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            provider,
            breaker,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Personality analysis for one member.
    pub async fn get_personality_profile(
        &self,
        member: &MemberProfile,
    ) -> Result<PersonalityProfile, AnalysisError> {
        let payload = self.run(personality_request(member)).await?;
        Ok(payload
            .map(|raw| normalize_personality(&raw))
            .unwrap_or_else(PersonalityProfile::neutral))
    }

    /// Implicit-preference analysis for one member.
    pub async fn get_implicit_preferences(
        &self,
        member: &MemberProfile,
    ) -> Result<ImplicitPreferenceProfile, AnalysisError> {
        let payload = self.run(implicit_request(member)).await?;
        Ok(payload
            .map(|raw| normalize_implicit(&raw))
            .unwrap_or_else(ImplicitPreferenceProfile::neutral))
    }

    /// Pairwise deep analysis.
    ///
    /// Returns the zero result without calling the AI when either personality
    /// profile is below the confidence threshold.
    pub async fn get_deep_compatibility(
        &self,
        a: &MemberProfile,
        b: &MemberProfile,
        profile_a: &PersonalityProfile,
        profile_b: &PersonalityProfile,
    ) -> Result<DeepCompatibilityResult, AnalysisError> {
        let threshold = self.config.deep_confidence_threshold;
        if profile_a.confidence_score < threshold || profile_b.confidence_score < threshold {
            debug!(
                member_a = %a.student_id,
                member_b = %b.student_id,
                confidence_a = profile_a.confidence_score,
                confidence_b = profile_b.confidence_score,
                threshold,
                "Skipping deep analysis for low-confidence profiles"
            );
            return Ok(DeepCompatibilityResult::zero());
        }

        let payload = self
            .run(deep_compatibility_request(a, b, profile_a, profile_b))
            .await?;
        Ok(payload
            .map(|raw| normalize_deep(&raw))
            .unwrap_or_else(DeepCompatibilityResult::zero))
    }

    /// Runs one analysis with retries.
    ///
    /// `Ok(None)` means every attempt failed with a retryable error.
    async fn run(&self, request: AnalysisRequest) -> Result<Option<Map<String, Value>>, AnalysisError> {
        let analysis_type = request.analysis_type;
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.attempt(&request).await {
                Ok(content) => match extract_json_object(&content) {
                    Ok(raw) => {
                        self.breaker.record_success();
                        debug!(
                            request_id = %request.request_id,
                            %analysis_type,
                            attempt,
                            "AI analysis succeeded"
                        );
                        return Ok(Some(raw));
                    }
                    Err(e) => {
                        self.breaker.record_error();
                        warn!(
                            request_id = %request.request_id,
                            %analysis_type,
                            attempt,
                            error = %e,
                            "AI analysis returned a malformed payload"
                        );
                        return Err(AnalysisError::Parsing {
                            analysis_type,
                            reason: e.to_string(),
                        });
                    }
                },
                Err(err) => {
                    self.breaker.record_error();

                    if !err.is_retryable() {
                        warn!(
                            request_id = %request.request_id,
                            %analysis_type,
                            attempt,
                            error = %err,
                            "AI analysis failed with a non-retryable error"
                        );
                        return Err(AnalysisError::Provider {
                            analysis_type,
                            source: err,
                        });
                    }

                    if attempt < max_attempts {
                        let delay = self.config.backoff_for(attempt);
                        warn!(
                            request_id = %request.request_id,
                            %analysis_type,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "AI analysis attempt failed, retrying"
                        );
                        sleep(delay).await;
                    } else {
                        warn!(
                            request_id = %request.request_id,
                            %analysis_type,
                            attempts = max_attempts,
                            error = %err,
                            "AI analysis attempts exhausted"
                        );
                    }
                }
            }
        }

        info!(%analysis_type, "Using neutral default analysis");
        Ok(None)
    }

    async fn attempt(&self, request: &AnalysisRequest) -> Result<String, AIError> {
        let limit = self.config.attempt_timeout;
        match timeout(limit, self.provider.analyze(request.clone())).await {
            Ok(result) => result.map(|response| response.content),
            Err(_) => Err(AIError::Timeout {
                timeout_secs: limit.as_secs().try_into().unwrap_or(u32::MAX),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::MemberId;
    use crate::domain::health::HealthMonitor;
    use crate::domain::member::Questionnaire;

    fn member(id: &str) -> MemberProfile {
        MemberProfile::new(MemberId::new(id).unwrap(), id)
            .with_questionnaire(Questionnaire::default().with_categories(["poetry"]))
    }

    fn pipeline(provider: MockAIProvider) -> (DeepAnalysisPipeline, Arc<HealthMonitor>) {
        let monitor = Arc::new(HealthMonitor::with_defaults());
        let pipeline = DeepAnalysisPipeline::new(Arc::new(provider), monitor.clone());
        (pipeline, monitor)
    }

    fn confident(score: f64) -> PersonalityProfile {
        PersonalityProfile {
            confidence_score: score,
            ..PersonalityProfile::neutral()
        }
    }

    #[test]
    fn backoff_doubles_up_to_ceiling() {
        let config = PipelineConfig::default();
        assert_eq!(config.backoff_for(1), Duration::from_millis(1000));
        assert_eq!(config.backoff_for(2), Duration::from_millis(2000));
        assert_eq!(config.backoff_for(3), Duration::from_millis(4000));
        assert_eq!(config.backoff_for(4), Duration::from_millis(5000));
        assert_eq!(config.backoff_for(40), Duration::from_millis(5000));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limited_three_times_returns_neutral_profile() {
        let provider = MockAIProvider::new().with_repeated_error(
            AnalysisType::Personality,
            MockError::RateLimited { retry_after_secs: 1 },
            3,
        );
        let (pipeline, monitor) = pipeline(provider.clone());

        let profile = pipeline.get_personality_profile(&member("a")).await.unwrap();

        assert_eq!(profile, PersonalityProfile::neutral());
        assert_eq!(profile.confidence_score, 0.0);
        assert_eq!(provider.call_count(), 3);
        assert_eq!(monitor.snapshot().total_errors, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_then_succeeds() {
        let provider = MockAIProvider::new()
            .with_error(
                AnalysisType::Implicit,
                MockError::Network {
                    message: "reset".into(),
                },
            )
            .with_response(AnalysisType::Implicit, r#"{"confidence_score": 0.7}"#);
        let (pipeline, monitor) = pipeline(provider.clone());

        let profile = pipeline.get_implicit_preferences(&member("a")).await.unwrap();

        assert_eq!(profile.confidence_score, 0.7);
        assert_eq!(provider.call_count(), 2);
        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.total_errors, 1);
        assert_eq!(snapshot.total_successes, 1);
        assert_eq!(snapshot.consecutive_errors, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_payload_is_not_retried() {
        let provider = MockAIProvider::new()
            .with_response(AnalysisType::Personality, "I think they are lovely")
            .with_response(AnalysisType::Personality, r#"{"confidence_score": 0.9}"#);
        let (pipeline, monitor) = pipeline(provider.clone());

        let err = pipeline.get_personality_profile(&member("a")).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Parsing { .. }));
        assert_eq!(provider.call_count(), 1);
        assert_eq!(monitor.snapshot().total_errors, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_credentials_are_retried_then_neutral() {
        let provider = MockAIProvider::new().failing_with(MockError::AuthenticationFailed);
        let (pipeline, monitor) = pipeline(provider.clone());

        let profile = pipeline.get_personality_profile(&member("a")).await.unwrap();

        assert_eq!(profile, PersonalityProfile::neutral());
        assert_eq!(provider.call_count(), 3);
        assert_eq!(monitor.snapshot().total_errors, 3);
    }

    #[tokio::test]
    async fn invalid_request_is_not_retried() {
        let provider = MockAIProvider::new().failing_with(MockError::InvalidRequest {
            message: "prompt too long".into(),
        });
        let (pipeline, _) = pipeline(provider.clone());

        let err = pipeline.get_personality_profile(&member("a")).await.unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Provider {
                analysis_type: AnalysisType::Personality,
                source: AIError::InvalidRequest(_),
            }
        ));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn low_confidence_short_circuits_deep_analysis() {
        let provider = MockAIProvider::new();
        let (pipeline, monitor) = pipeline(provider.clone());

        let result = pipeline
            .get_deep_compatibility(&member("a"), &member("b"), &confident(0.2), &confident(0.2))
            .await
            .unwrap();

        assert_eq!(result, DeepCompatibilityResult::zero());
        assert_eq!(provider.call_count(), 0);
        assert_eq!(monitor.snapshot().total_successes, 0);
    }

    #[tokio::test]
    async fn one_low_confidence_side_is_enough_to_skip() {
        let provider = MockAIProvider::new();
        let (pipeline, _) = pipeline(provider.clone());

        pipeline
            .get_deep_compatibility(&member("a"), &member("b"), &confident(0.9), &confident(0.29))
            .await
            .unwrap();

        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn confident_profiles_run_deep_analysis() {
        let provider = MockAIProvider::new().with_response(
            AnalysisType::DeepCompatibility,
            r#"{"compatibility_score": 0.8, "recommendation_confidence": 0.6}"#,
        );
        let (pipeline, _) = pipeline(provider.clone());

        let result = pipeline
            .get_deep_compatibility(&member("a"), &member("b"), &confident(0.8), &confident(0.5))
            .await
            .unwrap();

        assert!(result.succeeded());
        assert_eq!(result.recommendation_confidence, 0.6);
        assert_eq!(provider.call_count_for(AnalysisType::DeepCompatibility), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_attempts_time_out_and_retry() {
        let provider = MockAIProvider::new().with_delay(Duration::from_secs(60));
        let monitor = Arc::new(HealthMonitor::with_defaults());
        let pipeline = DeepAnalysisPipeline::with_config(
            Arc::new(provider.clone()),
            monitor.clone(),
            PipelineConfig::default().with_attempt_timeout(Duration::from_secs(5)),
        );

        let profile = pipeline.get_personality_profile(&member("a")).await.unwrap();

        assert_eq!(profile, PersonalityProfile::neutral());
        assert_eq!(provider.call_count(), 3);
        assert_eq!(monitor.snapshot().total_errors, 3);
    }
}
