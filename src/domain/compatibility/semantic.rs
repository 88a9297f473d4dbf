//! Semantic similarity from AI profiles, used by the AI-assisted path.

use std::collections::HashSet;

use crate::domain::analysis::{ImplicitPreferenceProfile, PersonalityProfile};
use crate::domain::weights::{ai, WeightGroup};

/// `1 - mean(|Δ|)` over paired [0, 1] dimensions.
fn closeness(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }
    let distance: f64 = a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum::<f64>() / a.len() as f64;
    Some((1.0 - distance).clamp(0.0, 1.0))
}

fn theme_overlap(a: &[String], b: &[String]) -> Option<f64> {
    let set_a: HashSet<String> = a.iter().map(|t| t.trim().to_lowercase()).collect();
    let set_b: HashSet<String> = b.iter().map(|t| t.trim().to_lowercase()).collect();
    if set_a.is_empty() || set_b.is_empty() {
        return None;
    }
    let shared = set_a.intersection(&set_b).count();
    Some(shared as f64 / set_a.union(&set_b).count() as f64)
}

/// Similarity of two members' AI profiles, or `None` when neither analysis
/// carries confident signal for both sides.
///
/// Personality contributes cognitive-dimension closeness; implicit profiles
/// contribute aesthetic-DNA closeness and shared-theme overlap.
pub fn semantic_similarity(
    personality: (&PersonalityProfile, &PersonalityProfile),
    implicit: (&ImplicitPreferenceProfile, &ImplicitPreferenceProfile),
) -> Option<f64> {
    let mut parts = Vec::with_capacity(3);

    let (pa, pb) = personality;
    if pa.confidence_score > 0.0 && pb.confidence_score > 0.0 {
        parts.extend(closeness(
            &pa.cognitive_dimensions.as_array(),
            &pb.cognitive_dimensions.as_array(),
        ));
    }

    let (ia, ib) = implicit;
    if ia.confidence_score > 0.0 && ib.confidence_score > 0.0 {
        parts.extend(closeness(&ia.aesthetic_dna.as_array(), &ib.aesthetic_dna.as_array()));
        parts.extend(theme_overlap(&ia.implicit_themes, &ib.implicit_themes));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.iter().sum::<f64>() / parts.len() as f64)
    }
}

/// `ai.traditional * traditional + ai.semantic * semantic`, normalised by
/// the group's weights.
pub fn blend_ai(traditional: f64, semantic: f64, weights: &WeightGroup) -> f64 {
    let wt = weights.weight(ai::TRADITIONAL);
    let ws = weights.weight(ai::SEMANTIC);
    let total = wt + ws;
    if total <= 0.0 {
        return traditional;
    }
    ((wt * traditional + ws * semantic) / total).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::CognitiveDimensions;
    use crate::domain::weights::WeightConfig;

    fn personality(confidence: f64, value: f64) -> PersonalityProfile {
        PersonalityProfile {
            cognitive_dimensions: CognitiveDimensions {
                systematic_thinking: value,
                intuitive_reasoning: value,
                emotional_sensitivity: value,
                abstract_thinking: value,
                exploratory_curiosity: value,
            },
            confidence_score: confidence,
            ..PersonalityProfile::neutral()
        }
    }

    fn implicit(confidence: f64, themes: &[&str]) -> ImplicitPreferenceProfile {
        ImplicitPreferenceProfile {
            implicit_themes: themes.iter().map(|t| t.to_string()).collect(),
            confidence_score: confidence,
            ..ImplicitPreferenceProfile::neutral()
        }
    }

    #[test]
    fn no_confident_signal_yields_none() {
        let n = implicit(0.0, &[]);
        assert_eq!(
            semantic_similarity((&personality(0.0, 0.5), &personality(0.9, 0.5)), (&n, &n)),
            None
        );
    }

    #[test]
    fn personality_closeness() {
        let n = implicit(0.0, &[]);
        let sim = semantic_similarity((&personality(0.9, 0.2), &personality(0.9, 0.6)), (&n, &n));
        assert!((sim.unwrap() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn implicit_adds_dna_and_themes() {
        let p = personality(0.0, 0.5);
        let a = implicit(0.8, &["Memory", "exile"]);
        let b = implicit(0.8, &["memory"]);
        // dna identical (1.0), themes 1/2
        let sim = semantic_similarity((&p, &p), (&a, &b)).unwrap();
        assert!((sim - 0.75).abs() < 1e-9);
    }

    #[test]
    fn blend_uses_ai_weights() {
        let weights = WeightConfig::default().ai;
        // 0.6 * 0.5 + 0.4 * 1.0
        assert!((blend_ai(0.5, 1.0, &weights) - 0.7).abs() < 1e-9);
    }
}
