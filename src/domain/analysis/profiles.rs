//! AI-derived member profiles and the pairwise deep compatibility result.
//!
//! These values are ephemeral: produced by the analysis pipeline for one
//! scoring call and only persisted as part of a cached compatibility result.

use serde::{Deserialize, Serialize};

/// Neutral value for personality and implicit-preference dimensions.
pub const NEUTRAL_DIMENSION: f64 = 0.5;

/// Five bounded cognitive dimensions, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CognitiveDimensions {
    pub systematic_thinking: f64,
    pub intuitive_reasoning: f64,
    pub emotional_sensitivity: f64,
    pub abstract_thinking: f64,
    pub exploratory_curiosity: f64,
}

impl CognitiveDimensions {
    pub fn neutral() -> Self {
        Self {
            systematic_thinking: NEUTRAL_DIMENSION,
            intuitive_reasoning: NEUTRAL_DIMENSION,
            emotional_sensitivity: NEUTRAL_DIMENSION,
            abstract_thinking: NEUTRAL_DIMENSION,
            exploratory_curiosity: NEUTRAL_DIMENSION,
        }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [
            self.systematic_thinking,
            self.intuitive_reasoning,
            self.emotional_sensitivity,
            self.abstract_thinking,
            self.exploratory_curiosity,
        ]
    }
}

/// Dominant way a reader engages with a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveStyle {
    Analytical,
    Intuitive,
    Creative,
    Practical,
    #[default]
    Balanced,
}

impl CognitiveStyle {
    /// Lenient parse; unknown labels fall back to `Balanced`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "analytical" | "systematic" => CognitiveStyle::Analytical,
            "intuitive" => CognitiveStyle::Intuitive,
            "creative" | "imaginative" => CognitiveStyle::Creative,
            "practical" | "pragmatic" => CognitiveStyle::Practical,
            _ => CognitiveStyle::Balanced,
        }
    }
}

/// Taste in prose and narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AestheticPreferences {
    pub narrative_complexity: f64,
    pub emotional_intensity: f64,
    pub prose_style: String,
}

impl AestheticPreferences {
    pub fn neutral() -> Self {
        Self {
            narrative_complexity: NEUTRAL_DIMENSION,
            emotional_intensity: NEUTRAL_DIMENSION,
            prose_style: String::new(),
        }
    }
}

/// AI personality analysis of one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    pub cognitive_dimensions: CognitiveDimensions,
    pub cognitive_style: CognitiveStyle,
    pub aesthetic_preferences: AestheticPreferences,
    pub confidence_score: f64,
}

impl PersonalityProfile {
    /// Neutral profile carrying no signal (`confidence_score = 0`).
    pub fn neutral() -> Self {
        Self {
            cognitive_dimensions: CognitiveDimensions::neutral(),
            cognitive_style: CognitiveStyle::Balanced,
            aesthetic_preferences: AestheticPreferences::neutral(),
            confidence_score: 0.0,
        }
    }
}

/// Preferred literary periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalPreference {
    pub classic_affinity: f64,
    pub contemporary_affinity: f64,
    pub era_focus: String,
}

impl TemporalPreference {
    pub fn neutral() -> Self {
        Self {
            classic_affinity: NEUTRAL_DIMENSION,
            contemporary_affinity: NEUTRAL_DIMENSION,
            era_focus: String::new(),
        }
    }
}

/// Openness to local versus world literature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalAffinity {
    pub local_literature: f64,
    pub world_literature: f64,
    pub regions: Vec<String>,
}

impl CulturalAffinity {
    pub fn neutral() -> Self {
        Self {
            local_literature: NEUTRAL_DIMENSION,
            world_literature: NEUTRAL_DIMENSION,
            regions: Vec::new(),
        }
    }
}

/// Compact fingerprint of aesthetic taste.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AestheticDna {
    pub lyricism: f64,
    pub darkness: f64,
    pub complexity: f64,
    pub pacing: f64,
}

impl AestheticDna {
    pub fn neutral() -> Self {
        Self {
            lyricism: NEUTRAL_DIMENSION,
            darkness: NEUTRAL_DIMENSION,
            complexity: NEUTRAL_DIMENSION,
            pacing: NEUTRAL_DIMENSION,
        }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.lyricism, self.darkness, self.complexity, self.pacing]
    }
}

/// AI analysis of preferences a member does not state explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplicitPreferenceProfile {
    pub implicit_themes: Vec<String>,
    pub reading_patterns: Vec<String>,
    pub temporal_preference: TemporalPreference,
    pub cultural_affinity: CulturalAffinity,
    pub aesthetic_dna: AestheticDna,
    pub confidence_score: f64,
}

impl ImplicitPreferenceProfile {
    /// Neutral profile carrying no signal (`confidence_score = 0`).
    pub fn neutral() -> Self {
        Self {
            implicit_themes: Vec::new(),
            reading_patterns: Vec::new(),
            temporal_preference: TemporalPreference::neutral(),
            cultural_affinity: CulturalAffinity::neutral(),
            aesthetic_dna: AestheticDna::neutral(),
            confidence_score: 0.0,
        }
    }
}

/// Pairwise compatibility sub-dimensions, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityDimensions {
    pub cognitive_synergy: f64,
    pub emotional_resonance: f64,
    pub aesthetic_harmony: f64,
    pub exploratory_balance: f64,
    pub growth_potential: f64,
}

impl CompatibilityDimensions {
    pub fn zero() -> Self {
        Self {
            cognitive_synergy: 0.0,
            emotional_resonance: 0.0,
            aesthetic_harmony: 0.0,
            exploratory_balance: 0.0,
            growth_potential: 0.0,
        }
    }
}

/// How two readers relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityType {
    Mirror,
    Complementary,
    Mentorship,
    Exploratory,
    #[default]
    Unknown,
}

impl CompatibilityType {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "mirror" | "similar" | "kindred" => CompatibilityType::Mirror,
            "complementary" => CompatibilityType::Complementary,
            "mentorship" | "mentor" => CompatibilityType::Mentorship,
            "exploratory" | "explorer" => CompatibilityType::Exploratory,
            _ => CompatibilityType::Unknown,
        }
    }
}

/// Expected liveliness of shared reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingChemistry {
    Low,
    Moderate,
    High,
    Exceptional,
    #[default]
    Unknown,
}

impl ReadingChemistry {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" | "weak" => ReadingChemistry::Low,
            "moderate" | "medium" => ReadingChemistry::Moderate,
            "high" | "strong" => ReadingChemistry::High,
            "exceptional" | "excellent" => ReadingChemistry::Exceptional,
            _ => ReadingChemistry::Unknown,
        }
    }
}

/// AI pairwise analysis of two members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepCompatibilityResult {
    pub compatibility_score: f64,
    pub dimensions: CompatibilityDimensions,
    pub compatibility_type: CompatibilityType,
    pub reading_chemistry: ReadingChemistry,
    pub recommendation_confidence: f64,
    pub shared_themes: Vec<String>,
    pub discussion_topics: Vec<String>,
    pub potential_friction: Vec<String>,
}

impl DeepCompatibilityResult {
    /// Zero-valued result used when the analysis is skipped or fails.
    pub fn zero() -> Self {
        Self {
            compatibility_score: 0.0,
            dimensions: CompatibilityDimensions::zero(),
            compatibility_type: CompatibilityType::Unknown,
            reading_chemistry: ReadingChemistry::Unknown,
            recommendation_confidence: 0.0,
            shared_themes: Vec::new(),
            discussion_topics: Vec::new(),
            potential_friction: Vec::new(),
        }
    }

    /// Whether the analysis produced a usable score.
    pub fn succeeded(&self) -> bool {
        self.compatibility_score > 0.0
    }
}
