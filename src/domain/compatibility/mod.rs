//! Compatibility module - Pure scoring primitives.
//!
//! - `traditional` - Questionnaire sub-similarities and their weighted mean
//! - `strategy` - Match types and how each combines traditional sub-scores
//! - `completeness` - Confidence-aware discount for AI-derived scores
//! - `semantic` - Profile similarity for the AI-assisted path
//! - `result` - The `CompatibilityResult` artifact and deep dimension mapping
//! - `cache_key` - Symmetric cache keys
//!
//! The orchestration (cache, circuit breaker, AI pipeline) lives in
//! `application::compatibility_engine`.

mod cache_key;
mod completeness;
mod result;
mod semantic;
mod strategy;
mod traditional;

pub use cache_key::{cache_key, profile_hash, CacheKeyStrategy};
pub use completeness::{
    CompletenessInputs, COMPLETENESS_BONUS, DEFAULT_COMPLETENESS, IMPLICIT_CONFIDENCE_FACTOR,
};
pub use result::{
    clamp_score, coefficients, describe_deep, describe_traditional, AnalysisBundle,
    CompatibilityResult, ScoreBreakdown, ScoringMode, MAX_SCORE,
};
pub use semantic::{blend_ai, semantic_similarity};
pub use strategy::{MatchType, TraditionalCombiner};
pub use traditional::{jaccard, to_score, TraditionalScores};
