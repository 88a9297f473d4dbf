//! Analysis Module - AI analysis payloads, profiles and sanitisation.
//!
//! # Components
//!
//! - `profiles` - Personality, implicit-preference and deep compatibility results
//! - `prompts` - Deterministic request payloads for each analysis type
//! - `normalize` - One sanitising function per response schema
//!
//! # Design Philosophy
//!
//! Everything here is pure. The pipeline that talks to the AI backend lives
//! in the application layer and only calls into these functions.

mod normalize;
mod profiles;
mod prompts;

pub use normalize::{
    extract_json_object, normalize_deep, normalize_implicit, normalize_personality, string_list,
    unit, ResponseParseError,
};
pub use profiles::{
    AestheticDna, AestheticPreferences, CognitiveDimensions, CognitiveStyle,
    CompatibilityDimensions, CompatibilityType, CulturalAffinity, DeepCompatibilityResult,
    ImplicitPreferenceProfile, PersonalityProfile, ReadingChemistry, TemporalPreference,
    NEUTRAL_DIMENSION,
};
pub use prompts::{
    deep_compatibility_request, implicit_request, personality_request, system_prompt_for,
};
