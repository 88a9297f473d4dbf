//! Request payloads for the three AI analyses.
//!
//! Payloads are deterministic: the same member data always yields the same
//! user prompt, so retries resend identical requests.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use super::profiles::PersonalityProfile;
use crate::domain::member::{MemberProfile, Questionnaire};
use crate::ports::{AnalysisRequest, AnalysisType};

const PREAMBLE: &str = "You are a literary psychologist helping a university reading club \
pair members for shared reading. Answer with a single JSON object and nothing else. \
All numeric fields are decimals between 0 and 1.";

static SYSTEM_PROMPTS: Lazy<HashMap<AnalysisType, String>> = Lazy::new(|| {
    let mut prompts = HashMap::new();
    prompts.insert(
        AnalysisType::Personality,
        system_prompt(
            "Infer the reader's personality from their questionnaire and favourite books.",
            json!({
                "cognitive_dimensions": {
                    "systematic_thinking": 0.0,
                    "intuitive_reasoning": 0.0,
                    "emotional_sensitivity": 0.0,
                    "abstract_thinking": 0.0,
                    "exploratory_curiosity": 0.0
                },
                "cognitive_style": "analytical | intuitive | creative | practical | balanced",
                "aesthetic_preferences": {
                    "narrative_complexity": 0.0,
                    "emotional_intensity": 0.0,
                    "prose_style": "string"
                },
                "confidence_score": 0.0
            }),
        ),
    );
    prompts.insert(
        AnalysisType::Implicit,
        system_prompt(
            "Infer reading preferences the member has not stated explicitly.",
            json!({
                "implicit_themes": ["string"],
                "reading_patterns": ["string"],
                "temporal_preference": {
                    "classic_affinity": 0.0,
                    "contemporary_affinity": 0.0,
                    "era_focus": "string"
                },
                "cultural_affinity": {
                    "local_literature": 0.0,
                    "world_literature": 0.0,
                    "regions": ["string"]
                },
                "aesthetic_dna": {
                    "lyricism": 0.0,
                    "darkness": 0.0,
                    "complexity": 0.0,
                    "pacing": 0.0
                },
                "confidence_score": 0.0
            }),
        ),
    );
    prompts.insert(
        AnalysisType::DeepCompatibility,
        system_prompt(
            "Assess how well two readers would read and discuss books together.",
            json!({
                "compatibility_score": 0.0,
                "compatibility_dimensions": {
                    "cognitive_synergy": 0.0,
                    "emotional_resonance": 0.0,
                    "aesthetic_harmony": 0.0,
                    "exploratory_balance": 0.0,
                    "growth_potential": 0.0
                },
                "compatibility_type": "mirror | complementary | mentorship | exploratory",
                "reading_chemistry": "low | moderate | high | exceptional",
                "recommendation_confidence": 0.0,
                "shared_themes": ["string"],
                "discussion_topics": ["string"],
                "potential_friction": ["string"]
            }),
        ),
    );
    prompts
});

fn system_prompt(task: &str, schema: Value) -> String {
    format!(
        "{PREAMBLE}\n\n{task}\n\nRespond with this schema:\n{}",
        serde_json::to_string_pretty(&schema).unwrap_or_default()
    )
}

/// System instruction for an analysis type.
pub fn system_prompt_for(analysis_type: AnalysisType) -> &'static str {
    SYSTEM_PROMPTS
        .get(&analysis_type)
        .map(String::as_str)
        .unwrap_or(PREAMBLE)
}

fn questionnaire_payload(q: &Questionnaire) -> Value {
    json!({
        "grade": q.grade,
        "major": q.major,
        "book_categories": q.book_categories,
        "favorite_books": q.favorite_books,
        "interests": q.interests,
        "personality_traits": {
            "openness": q.personality_traits.openness,
            "conscientiousness": q.personality_traits.conscientiousness,
            "extraversion": q.personality_traits.extraversion,
            "agreeableness": q.personality_traits.agreeableness
        },
        "description": q.description
    })
}

fn member_payload(member: &MemberProfile) -> Value {
    json!({
        "member_id": member.student_id.as_str(),
        "name": member.name,
        "questionnaire": questionnaire_payload(&member.questionnaire)
    })
}

/// Personality analysis request for one member.
pub fn personality_request(member: &MemberProfile) -> AnalysisRequest {
    AnalysisRequest::new(
        AnalysisType::Personality,
        system_prompt_for(AnalysisType::Personality),
        member_payload(member).to_string(),
    )
}

/// Implicit-preference analysis request for one member.
pub fn implicit_request(member: &MemberProfile) -> AnalysisRequest {
    AnalysisRequest::new(
        AnalysisType::Implicit,
        system_prompt_for(AnalysisType::Implicit),
        member_payload(member).to_string(),
    )
}

/// Pairwise deep-compatibility request, including both personality profiles.
pub fn deep_compatibility_request(
    a: &MemberProfile,
    b: &MemberProfile,
    profile_a: &PersonalityProfile,
    profile_b: &PersonalityProfile,
) -> AnalysisRequest {
    let payload = json!({
        "member_a": {
            "member": member_payload(a),
            "personality": profile_a
        },
        "member_b": {
            "member": member_payload(b),
            "personality": profile_b
        }
    });

    AnalysisRequest::new(
        AnalysisType::DeepCompatibility,
        system_prompt_for(AnalysisType::DeepCompatibility),
        payload.to_string(),
    )
}
