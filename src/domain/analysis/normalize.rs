//! Sanitisation of AI responses.
//!
//! Every schema has exactly one normalize function. Numeric fields are
//! clamped into [0, 1]; absent or malformed values fall back to the neutral
//! default of their field; list fields are coerced to lists of strings.
//! Nothing produced by the AI reaches the scoring code without passing
//! through here.

use serde_json::{Map, Value};
use thiserror::Error;

use super::profiles::{
    AestheticDna, AestheticPreferences, CognitiveDimensions, CognitiveStyle,
    CompatibilityDimensions, CompatibilityType, CulturalAffinity, DeepCompatibilityResult,
    ImplicitPreferenceProfile, PersonalityProfile, ReadingChemistry, TemporalPreference,
    NEUTRAL_DIMENSION,
};

/// Default for confidence and compatibility fields.
const ZERO: f64 = 0.0;

/// The AI returned something that is not a JSON object.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResponseParseError {
    #[error("empty response")]
    Empty,

    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response is JSON but not an object")]
    NotAnObject,
}

/// Extracts the JSON object from raw model output.
///
/// Models sometimes wrap JSON in markdown code fences; those are stripped.
pub fn extract_json_object(content: &str) -> Result<Map<String, Value>, ResponseParseError> {
    let trimmed = strip_code_fence(content.trim());
    if trimmed.is_empty() {
        return Err(ResponseParseError::Empty);
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ResponseParseError::NotAnObject),
        Err(e) => Err(ResponseParseError::InvalidJson(e.to_string())),
    }
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    // Drop the language tag line ("```json")
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Reads a number in [0, 1], accepting numeric strings.
///
/// Values outside the range are clamped; non-finite or non-numeric values
/// yield `default`.
pub fn unit(value: Option<&Value>, default: f64) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match raw {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => default,
    }
}

/// Reads a list of strings. A single string becomes a one-element list;
/// non-string entries are dropped; anything else is an empty list.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn text(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn object(value: Option<&Value>) -> Option<&Map<String, Value>> {
    value.and_then(Value::as_object)
}

/// Looks up `key` in a nested object, if the parent is one.
fn field<'a>(parent: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a Value> {
    parent.and_then(|m| m.get(key))
}

/// Sanitises a personality analysis response.
pub fn normalize_personality(raw: &Map<String, Value>) -> PersonalityProfile {
    let dims = object(raw.get("cognitive_dimensions"));
    let aesthetic = object(raw.get("aesthetic_preferences"));

    PersonalityProfile {
        cognitive_dimensions: CognitiveDimensions {
            systematic_thinking: unit(field(dims, "systematic_thinking"), NEUTRAL_DIMENSION),
            intuitive_reasoning: unit(field(dims, "intuitive_reasoning"), NEUTRAL_DIMENSION),
            emotional_sensitivity: unit(field(dims, "emotional_sensitivity"), NEUTRAL_DIMENSION),
            abstract_thinking: unit(field(dims, "abstract_thinking"), NEUTRAL_DIMENSION),
            exploratory_curiosity: unit(field(dims, "exploratory_curiosity"), NEUTRAL_DIMENSION),
        },
        cognitive_style: raw
            .get("cognitive_style")
            .and_then(Value::as_str)
            .map(CognitiveStyle::parse)
            .unwrap_or_default(),
        aesthetic_preferences: AestheticPreferences {
            narrative_complexity: unit(field(aesthetic, "narrative_complexity"), NEUTRAL_DIMENSION),
            emotional_intensity: unit(field(aesthetic, "emotional_intensity"), NEUTRAL_DIMENSION),
            prose_style: text(field(aesthetic, "prose_style")),
        },
        confidence_score: unit(raw.get("confidence_score"), ZERO),
    }
}

/// Sanitises an implicit-preference analysis response.
pub fn normalize_implicit(raw: &Map<String, Value>) -> ImplicitPreferenceProfile {
    let temporal = object(raw.get("temporal_preference"));
    let cultural = object(raw.get("cultural_affinity"));
    let dna = object(raw.get("aesthetic_dna"));

    ImplicitPreferenceProfile {
        implicit_themes: string_list(raw.get("implicit_themes")),
        reading_patterns: string_list(raw.get("reading_patterns")),
        temporal_preference: TemporalPreference {
            classic_affinity: unit(field(temporal, "classic_affinity"), NEUTRAL_DIMENSION),
            contemporary_affinity: unit(field(temporal, "contemporary_affinity"), NEUTRAL_DIMENSION),
            era_focus: text(field(temporal, "era_focus")),
        },
        cultural_affinity: CulturalAffinity {
            local_literature: unit(field(cultural, "local_literature"), NEUTRAL_DIMENSION),
            world_literature: unit(field(cultural, "world_literature"), NEUTRAL_DIMENSION),
            regions: string_list(field(cultural, "regions")),
        },
        aesthetic_dna: AestheticDna {
            lyricism: unit(field(dna, "lyricism"), NEUTRAL_DIMENSION),
            darkness: unit(field(dna, "darkness"), NEUTRAL_DIMENSION),
            complexity: unit(field(dna, "complexity"), NEUTRAL_DIMENSION),
            pacing: unit(field(dna, "pacing"), NEUTRAL_DIMENSION),
        },
        confidence_score: unit(raw.get("confidence_score"), ZERO),
    }
}

/// Sanitises a deep-compatibility analysis response.
pub fn normalize_deep(raw: &Map<String, Value>) -> DeepCompatibilityResult {
    let dims = object(raw.get("compatibility_dimensions")).or_else(|| object(raw.get("dimensions")));

    DeepCompatibilityResult {
        compatibility_score: unit(raw.get("compatibility_score"), ZERO),
        dimensions: CompatibilityDimensions {
            cognitive_synergy: unit(field(dims, "cognitive_synergy"), ZERO),
            emotional_resonance: unit(field(dims, "emotional_resonance"), ZERO),
            aesthetic_harmony: unit(field(dims, "aesthetic_harmony"), ZERO),
            exploratory_balance: unit(field(dims, "exploratory_balance"), ZERO),
            growth_potential: unit(field(dims, "growth_potential"), ZERO),
        },
        compatibility_type: raw
            .get("compatibility_type")
            .and_then(Value::as_str)
            .map(CompatibilityType::parse)
            .unwrap_or_default(),
        reading_chemistry: raw
            .get("reading_chemistry")
            .and_then(Value::as_str)
            .map(ReadingChemistry::parse)
            .unwrap_or_default(),
        recommendation_confidence: unit(raw.get("recommendation_confidence"), ZERO),
        shared_themes: string_list(raw.get("shared_themes")),
        discussion_topics: string_list(raw.get("discussion_topics")),
        potential_friction: string_list(raw.get("potential_friction")),
    }
}
