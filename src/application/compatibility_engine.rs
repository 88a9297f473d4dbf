//! CompatibilityEngine - Scores one pair of members.
//!
//! Order of operations for every call:
//!
//! 1. Gender-preference gate (never cached)
//! 2. Weight-change check, clearing the cache if weights moved
//! 3. Cache lookup
//! 4. Mode selection: traditional when AI is off or the circuit is degraded
//! 5. AI path (AI-assisted or deep), falling back to traditional on failure
//! 6. Cache store, skipped when the weights were replaced mid-computation
//!
//! AI failures never reach the caller; they surface as a degraded result.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::deep_analysis::{AnalysisError, DeepAnalysisPipeline};
use crate::domain::compatibility::{
    blend_ai, cache_key, clamp_score, describe_deep, describe_traditional, semantic_similarity,
    AnalysisBundle, CacheKeyStrategy, CompatibilityResult, CompletenessInputs, MatchType,
    ScoreBreakdown, ScoringMode, TraditionalScores, MAX_SCORE,
};
use crate::domain::foundation::Timestamp;
use crate::domain::member::{gender_preference_compatible, MemberProfile};
use crate::domain::weights::{WeightConfig, WeightStore};
use crate::ports::{CircuitBreaker, ResultCache};

/// Reason recorded when the circuit breaker blocks AI calls.
pub const DEGRADED_REASON: &str = "AI service degraded";

/// How much AI analysis the AI path runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisDepth {
    /// Personality and implicit analyses blended with the `ai` weights.
    Standard,
    /// Personality, implicit and pairwise deep analyses.
    #[default]
    Deep,
}

/// Engine tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub cache_ttl: Duration,
    pub cache_key: CacheKeyStrategy,
    pub depth: AnalysisDepth,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(600),
            cache_key: CacheKeyStrategy::MemberPair,
            depth: AnalysisDepth::Deep,
        }
    }
}

/// Orchestrates scoring of member pairs.
pub struct CompatibilityEngine {
    weights: Arc<WeightStore>,
    weight_updates: Mutex<watch::Receiver<Arc<WeightConfig>>>,
    breaker: Arc<dyn CircuitBreaker>,
    pipeline: Arc<DeepAnalysisPipeline>,
    cache: Arc<dyn ResultCache>,
    config: EngineConfig,
}

impl CompatibilityEngine {
    pub fn new(
        weights: Arc<WeightStore>,
        breaker: Arc<dyn CircuitBreaker>,
        pipeline: Arc<DeepAnalysisPipeline>,
        cache: Arc<dyn ResultCache>,
        config: EngineConfig,
    ) -> Self {
        let weight_updates = Mutex::new(weights.subscribe());
        Self {
            weights,
            weight_updates,
            breaker,
            pipeline,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn breaker(&self) -> &Arc<dyn CircuitBreaker> {
        &self.breaker
    }

    /// Scores a pair. Symmetric in `a` and `b`.
    pub async fn score(
        &self,
        a: &MemberProfile,
        b: &MemberProfile,
        match_type: MatchType,
        use_ai: bool,
    ) -> CompatibilityResult {
        if !gender_preference_compatible(a, b) {
            debug!(
                member_a = %a.student_id,
                member_b = %b.student_id,
                "Gender preferences exclude pair"
            );
            return CompatibilityResult::gender_mismatch(match_type);
        }

        self.invalidate_if_weights_changed().await;
        let weights = self.weights.get_weights();

        // Canonical order so AI requests and bundles do not depend on argument order
        let (a, b) = if a.student_id <= b.student_id { (a, b) } else { (b, a) };

        let requested_mode = self.requested_mode(use_ai);
        let key = cache_key(self.config.cache_key, a, b, match_type, requested_mode);

        match self.cache.get(&key).await {
            Ok(Some(hit)) => {
                debug!(cache_key = %key, "Compatibility cache hit");
                return hit;
            }
            Ok(None) => debug!(cache_key = %key, "Compatibility cache miss"),
            Err(e) => warn!(cache_key = %key, error = %e, "Cache read failed, treating as miss"),
        }

        let result = self.compute(a, b, match_type, use_ai, &weights).await;

        // Degraded results are not stored so recovery takes effect immediately
        if !result.degraded {
            self.store(&key, &result, &weights).await;
        }

        result
    }

    /// Traditional-path result for a pair, ignoring cache and AI.
    pub fn traditional(&self, a: &MemberProfile, b: &MemberProfile, match_type: MatchType) -> CompatibilityResult {
        if !gender_preference_compatible(a, b) {
            return CompatibilityResult::gender_mismatch(match_type);
        }
        let weights = self.weights.get_weights();
        let (scores, similarity) = traditional_similarity(a, b, match_type, &weights);
        CompatibilityResult::traditional(match_type, scores, similarity)
    }

    /// Clears every cached result.
    pub async fn invalidate_cache(&self) {
        match self.cache.clear().await {
            Ok(()) => info!("Compatibility cache cleared"),
            Err(e) => warn!(error = %e, "Failed to clear compatibility cache"),
        }
    }

    fn requested_mode(&self, use_ai: bool) -> ScoringMode {
        match (use_ai, self.config.depth) {
            (false, _) => ScoringMode::Traditional,
            (true, AnalysisDepth::Standard) => ScoringMode::AiAssisted,
            (true, AnalysisDepth::Deep) => ScoringMode::Deep,
        }
    }

    /// True while `snapshot` is still the live weight configuration.
    fn weights_current(&self, snapshot: &Arc<WeightConfig>) -> bool {
        Arc::ptr_eq(snapshot, &self.weights.get_weights())
    }

    /// Caches a result computed with `snapshot`, unless the weights moved on.
    async fn store(&self, key: &str, result: &CompatibilityResult, snapshot: &Arc<WeightConfig>) {
        if !self.weights_current(snapshot) {
            debug!(cache_key = %key, "Weights replaced during scoring, result not cached");
            return;
        }

        if let Err(e) = self.cache.set(key, result, self.config.cache_ttl).await {
            warn!(cache_key = %key, error = %e, "Cache write failed");
            return;
        }

        // An update that landed during the write may have cleared the cache already
        if !self.weights_current(snapshot) {
            debug!(cache_key = %key, "Weights replaced during cache write, evicting result");
            if let Err(e) = self.cache.delete(key).await {
                warn!(cache_key = %key, error = %e, "Failed to evict stale result");
            }
        }
    }

    async fn invalidate_if_weights_changed(&self) {
        let changed = {
            let mut rx = self
                .weight_updates
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match rx.has_changed() {
                Ok(true) => {
                    rx.borrow_and_update();
                    true
                }
                _ => false,
            }
        };

        if changed {
            info!("Weights changed, invalidating compatibility cache");
            self.invalidate_cache().await;
        }
    }

    async fn compute(
        &self,
        a: &MemberProfile,
        b: &MemberProfile,
        match_type: MatchType,
        use_ai: bool,
        weights: &WeightConfig,
    ) -> CompatibilityResult {
        let (scores, similarity) = traditional_similarity(a, b, match_type, weights);
        let baseline = || CompatibilityResult::traditional(match_type, scores, similarity);

        if !use_ai {
            return baseline();
        }

        if !self.breaker.should_use_ai() {
            info!(
                member_a = %a.student_id,
                member_b = %b.student_id,
                "AI unavailable, using traditional scoring"
            );
            return baseline().into_degraded(DEGRADED_REASON);
        }

        let outcome = match self.config.depth {
            AnalysisDepth::Deep => self.deep_path(a, b, match_type, weights, scores, similarity).await,
            AnalysisDepth::Standard => {
                self.standard_path(a, b, match_type, weights, scores, similarity)
                    .await
            }
        };

        match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    member_a = %a.student_id,
                    member_b = %b.student_id,
                    error = %e,
                    "AI path failed, falling back to traditional scoring"
                );
                baseline().into_degraded(e.to_string())
            }
        }
    }

    async fn deep_path(
        &self,
        a: &MemberProfile,
        b: &MemberProfile,
        match_type: MatchType,
        weights: &WeightConfig,
        scores: TraditionalScores,
        similarity: f64,
    ) -> Result<CompatibilityResult, AnalysisError> {
        let (pa, pb, ia, ib) = futures::join!(
            self.pipeline.get_personality_profile(a),
            self.pipeline.get_personality_profile(b),
            self.pipeline.get_implicit_preferences(a),
            self.pipeline.get_implicit_preferences(b),
        );
        let (pa, pb, ia, ib) = (pa?, pb?, ia?, ib?);

        let deep = self.pipeline.get_deep_compatibility(a, b, &pa, &pb).await?;

        let multiplier = CompletenessInputs {
            personality_a: pa.confidence_score,
            personality_b: pb.confidence_score,
            implicit_a: ia.confidence_score,
            implicit_b: ib.confidence_score,
            deep_recommendation: Some(deep.recommendation_confidence),
        }
        .multiplier();

        let (score, breakdown, reason) = if deep.succeeded() {
            let breakdown = ScoreBreakdown::from_deep(similarity, &deep);
            let score = clamp_score(breakdown.weighted(&weights.deep) * multiplier);
            (score, breakdown, describe_deep(&deep))
        } else {
            let breakdown = ScoreBreakdown::traditional(similarity);
            let score = clamp_score(breakdown.traditional_similarity * multiplier);
            (
                score,
                breakdown,
                format!("Limited AI signal. {}", describe_traditional(&scores, similarity)),
            )
        };

        debug!(
            member_a = %a.student_id,
            member_b = %b.student_id,
            score,
            multiplier,
            deep_succeeded = deep.succeeded(),
            "Deep compatibility scored"
        );

        Ok(CompatibilityResult {
            score,
            reason,
            breakdown,
            traditional: scores,
            match_type,
            mode: ScoringMode::Deep,
            degraded: false,
            degradation_reason: None,
            gender_preference_compatible: true,
            analysis: Some(AnalysisBundle {
                personality_a: pa,
                personality_b: pb,
                implicit_a: ia,
                implicit_b: ib,
                deep: Some(deep),
                completeness_multiplier: multiplier,
            }),
            computed_at: Timestamp::now(),
        })
    }

    async fn standard_path(
        &self,
        a: &MemberProfile,
        b: &MemberProfile,
        match_type: MatchType,
        weights: &WeightConfig,
        scores: TraditionalScores,
        similarity: f64,
    ) -> Result<CompatibilityResult, AnalysisError> {
        let (pa, pb, ia, ib) = futures::join!(
            self.pipeline.get_personality_profile(a),
            self.pipeline.get_personality_profile(b),
            self.pipeline.get_implicit_preferences(a),
            self.pipeline.get_implicit_preferences(b),
        );
        let (pa, pb, ia, ib) = (pa?, pb?, ia?, ib?);

        let semantic = semantic_similarity((&pa, &pb), (&ia, &ib)).unwrap_or(similarity);
        let blended = blend_ai(similarity, semantic, &weights.ai);

        let multiplier = CompletenessInputs {
            personality_a: pa.confidence_score,
            personality_b: pb.confidence_score,
            implicit_a: ia.confidence_score,
            implicit_b: ib.confidence_score,
            deep_recommendation: None,
        }
        .multiplier();

        let max = f64::from(MAX_SCORE);
        let score = clamp_score(blended * max * multiplier);

        Ok(CompatibilityResult {
            score,
            reason: format!(
                "AI-assisted match {:.0}% (semantic {:.0}%, questionnaire {:.0}%)",
                blended * 100.0,
                semantic * 100.0,
                similarity * 100.0
            ),
            breakdown: ScoreBreakdown {
                overall_chemistry: blended * max,
                ..ScoreBreakdown::traditional(similarity)
            },
            traditional: scores,
            match_type,
            mode: ScoringMode::AiAssisted,
            degraded: false,
            degradation_reason: None,
            gender_preference_compatible: true,
            analysis: Some(AnalysisBundle {
                personality_a: pa,
                personality_b: pb,
                implicit_a: ia,
                implicit_b: ib,
                deep: None,
                completeness_multiplier: multiplier,
            }),
            computed_at: Timestamp::now(),
        })
    }
}

fn traditional_similarity(
    a: &MemberProfile,
    b: &MemberProfile,
    match_type: MatchType,
    weights: &WeightConfig,
) -> (TraditionalScores, f64) {
    let scores = TraditionalScores::compute(&a.questionnaire, &b.questionnaire);
    let similarity = match_type.traditional_similarity(&scores, weights);
    (scores, similarity)
}
