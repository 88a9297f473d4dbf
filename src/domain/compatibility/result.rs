//! The compatibility result returned to callers and stored in the cache.

use serde::{Deserialize, Serialize};

use super::strategy::MatchType;
use super::traditional::TraditionalScores;
use crate::domain::analysis::{
    DeepCompatibilityResult, ImplicitPreferenceProfile, PersonalityProfile,
};
use crate::domain::foundation::Timestamp;
use crate::domain::weights::{deep, WeightGroup};

/// Linear coefficients mapping deep sub-dimensions onto target dimensions.
pub mod coefficients {
    pub const COGNITIVE_SYNERGY: f64 = 2.0;
    pub const EMOTIONAL_RESONANCE: f64 = 1.5;
    pub const AESTHETIC_HARMONY: f64 = 2.0;
    pub const EXPLORATORY_BALANCE: f64 = 1.3;
    pub const GROWTH_POTENTIAL: f64 = 2.5;
    pub const OVERALL_CHEMISTRY: f64 = 3.0;
}

/// Highest integer score.
pub const MAX_SCORE: u8 = 10;

/// How a result was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Questionnaire data only.
    Traditional,
    /// Traditional blended with personality and implicit analyses.
    AiAssisted,
    /// Full deep compatibility analysis.
    Deep,
}

impl ScoringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMode::Traditional => "traditional",
            ScoringMode::AiAssisted => "ai_assisted",
            ScoringMode::Deep => "deep",
        }
    }
}

/// Per-dimension breakdown. `traditional_similarity` is on the 0–10 scale;
/// the AI dimensions carry their mapped (coefficient-scaled) values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub traditional_similarity: f64,
    pub personality_compatibility: f64,
    pub implicit_resonance: f64,
    pub growth_potential: f64,
    pub overall_chemistry: f64,
}

impl ScoreBreakdown {
    /// Breakdown with only the traditional dimension filled.
    pub fn traditional(similarity: f64) -> Self {
        Self {
            traditional_similarity: similarity * f64::from(MAX_SCORE),
            ..Default::default()
        }
    }

    /// Maps a successful deep analysis onto the target dimensions.
    pub fn from_deep(traditional_similarity: f64, deep: &DeepCompatibilityResult) -> Self {
        let d = &deep.dimensions;
        Self {
            traditional_similarity: traditional_similarity * f64::from(MAX_SCORE),
            personality_compatibility: d.cognitive_synergy * coefficients::COGNITIVE_SYNERGY
                + d.emotional_resonance * coefficients::EMOTIONAL_RESONANCE,
            implicit_resonance: d.aesthetic_harmony * coefficients::AESTHETIC_HARMONY
                + d.exploratory_balance * coefficients::EXPLORATORY_BALANCE,
            growth_potential: d.growth_potential * coefficients::GROWTH_POTENTIAL,
            overall_chemistry: deep.compatibility_score * coefficients::OVERALL_CHEMISTRY,
        }
    }

    /// Weighted sum under the `deep` weight group.
    pub fn weighted(&self, weights: &WeightGroup) -> f64 {
        self.traditional_similarity * weights.weight(deep::TRADITIONAL_SIMILARITY)
            + self.personality_compatibility * weights.weight(deep::PERSONALITY_COMPATIBILITY)
            + self.implicit_resonance * weights.weight(deep::IMPLICIT_RESONANCE)
            + self.growth_potential * weights.weight(deep::GROWTH_POTENTIAL)
    }
}

/// Clamps a raw score into the integer [0, 10] range.
pub fn clamp_score(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, f64::from(MAX_SCORE)) as u8
}

/// Raw AI sub-analyses behind a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBundle {
    pub personality_a: PersonalityProfile,
    pub personality_b: PersonalityProfile,
    pub implicit_a: ImplicitPreferenceProfile,
    pub implicit_b: ImplicitPreferenceProfile,
    /// Absent on the AI-assisted path.
    pub deep: Option<DeepCompatibilityResult>,
    pub completeness_multiplier: f64,
}

/// Final artifact of scoring one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    /// Integer score in [0, 10].
    pub score: u8,
    pub reason: String,
    pub breakdown: ScoreBreakdown,
    pub traditional: TraditionalScores,
    pub match_type: MatchType,
    pub mode: ScoringMode,
    pub degraded: bool,
    pub degradation_reason: Option<String>,
    pub gender_preference_compatible: bool,
    pub analysis: Option<AnalysisBundle>,
    pub computed_at: Timestamp,
}

impl CompatibilityResult {
    /// Zero score for a pair whose gender preferences exclude each other.
    pub fn gender_mismatch(match_type: MatchType) -> Self {
        Self {
            score: 0,
            reason: "Gender match preferences are not mutually satisfied".to_string(),
            breakdown: ScoreBreakdown::default(),
            traditional: TraditionalScores::default(),
            match_type,
            mode: ScoringMode::Traditional,
            degraded: false,
            degradation_reason: None,
            gender_preference_compatible: false,
            analysis: None,
            computed_at: Timestamp::now(),
        }
    }

    /// Result of the traditional path.
    pub fn traditional(match_type: MatchType, scores: TraditionalScores, similarity: f64) -> Self {
        Self {
            score: super::traditional::to_score(similarity),
            reason: describe_traditional(&scores, similarity),
            breakdown: ScoreBreakdown::traditional(similarity),
            traditional: scores,
            match_type,
            mode: ScoringMode::Traditional,
            degraded: false,
            degradation_reason: None,
            gender_preference_compatible: true,
            analysis: None,
            computed_at: Timestamp::now(),
        }
    }

    /// Marks the result as a fallback for a failed or disabled AI path.
    pub fn into_degraded(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        self.reason = format!("{} (fallback: {})", self.reason, reason);
        self.degraded = true;
        self.degradation_reason = Some(reason);
        self
    }

    pub fn is_match(&self) -> bool {
        self.score > 0
    }
}

fn factor_label(factor: &str) -> &'static str {
    match factor {
        "basic" => "grade and major",
        "reading" => "book categories",
        "interest" => "interests",
        "personality" => "personality traits",
        _ => "questionnaire",
    }
}

/// Human-readable summary of a traditional score.
pub fn describe_traditional(scores: &TraditionalScores, similarity: f64) -> String {
    let mut present: Vec<(&str, f64)> = scores.present().collect();
    if present.is_empty() {
        return "Not enough questionnaire data to compare".to_string();
    }
    present.sort_by(|a, b| b.1.total_cmp(&a.1));

    let highlights: Vec<String> = present
        .iter()
        .take(2)
        .map(|(factor, score)| format!("{} {:.0}%", factor_label(factor), score * 100.0))
        .collect();

    format!(
        "Questionnaire match {:.0}%: {}",
        similarity * 100.0,
        highlights.join(", ")
    )
}

/// Human-readable summary of a deep-analysis score.
pub fn describe_deep(deep: &DeepCompatibilityResult) -> String {
    let mut reason = format!(
        "{:?} pairing with {:?} reading chemistry",
        deep.compatibility_type, deep.reading_chemistry
    );
    if !deep.shared_themes.is_empty() {
        let themes: Vec<&str> = deep.shared_themes.iter().take(3).map(String::as_str).collect();
        reason.push_str(&format!("; shared themes: {}", themes.join(", ")));
    }
    reason
}
