//! Traditional (non-AI) similarity between two questionnaires.
//!
//! Four sub-similarities, each in [0, 1]. A sub-score is `None` when the
//! input it needs is missing on either side; absent sub-scores are skipped
//! and their weight excluded from normalisation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::member::{PersonalityTraits, Questionnaire};
use crate::domain::weights::{traditional, WeightGroup};

/// Score for an exact grade or major match.
const EXACT_MATCH: f64 = 1.0;

/// Score for a partially matching major.
const PARTIAL_MATCH: f64 = 0.5;

/// Traditional sub-similarities for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TraditionalScores {
    pub basic: Option<f64>,
    pub reading: Option<f64>,
    pub interest: Option<f64>,
    pub personality: Option<f64>,
}

impl TraditionalScores {
    /// Computes all four sub-similarities. Symmetric in its arguments.
    pub fn compute(a: &Questionnaire, b: &Questionnaire) -> Self {
        Self {
            basic: basic_similarity(a, b),
            reading: jaccard(&a.category_set(), &b.category_set()),
            interest: jaccard(&a.interest_set(), &b.interest_set()),
            personality: trait_similarity(&a.personality_traits, &b.personality_traits),
        }
    }

    /// The same scores with reading, interest and personality turned into
    /// divergence (`1 - similarity`). Basic-info similarity is kept.
    pub fn complemented(&self) -> Self {
        Self {
            basic: self.basic,
            reading: self.reading.map(|s| 1.0 - s),
            interest: self.interest.map(|s| 1.0 - s),
            personality: self.personality.map(|s| 1.0 - s),
        }
    }

    /// `(factor, score)` for every sub-score that applies.
    pub fn present(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            (traditional::BASIC, self.basic),
            (traditional::READING, self.reading),
            (traditional::INTEREST, self.interest),
            (traditional::PERSONALITY, self.personality),
        ]
        .into_iter()
        .filter_map(|(factor, score)| score.map(|s| (factor, s)))
    }

    /// Weighted mean of the present sub-scores, normalised by the weights
    /// actually applied. Zero when nothing applies.
    pub fn weighted(&self, weights: &WeightGroup) -> f64 {
        let (total, applied) = self
            .present()
            .fold((0.0, 0.0), |(total, applied), (factor, score)| {
                let w = weights.weight(factor);
                (total + w * score, applied + w)
            });

        if applied <= 0.0 {
            0.0
        } else {
            (total / applied).clamp(0.0, 1.0)
        }
    }
}

/// Scales a [0, 1] similarity to the integer [0, 10] score.
pub fn to_score(similarity: f64) -> u8 {
    if !similarity.is_finite() {
        return 0;
    }
    (similarity * 10.0).round().clamp(0.0, 10.0) as u8
}

/// Grade and major comparison, averaged over the fields both members filled.
fn basic_similarity(a: &Questionnaire, b: &Questionnaire) -> Option<f64> {
    let mut parts = Vec::with_capacity(2);

    if let (Some(ga), Some(gb)) = (non_blank(&a.grade), non_blank(&b.grade)) {
        parts.push(if ga == gb { EXACT_MATCH } else { 0.0 });
    }
    if let (Some(ma), Some(mb)) = (non_blank(&a.major), non_blank(&b.major)) {
        parts.push(major_similarity(&ma, &mb));
    }

    mean(&parts)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

/// Exact match, or partial when one major contains the other or they share
/// a word ("computer science" / "computer engineering").
fn major_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return EXACT_MATCH;
    }
    if a.contains(b) || b.contains(a) {
        return PARTIAL_MATCH;
    }

    let words_a: HashSet<&str> = a.split_whitespace().collect();
    if b.split_whitespace().any(|w| words_a.contains(w)) {
        PARTIAL_MATCH
    } else {
        0.0
    }
}

/// Jaccard similarity of two keyword sets.
pub fn jaccard(a: &[String], b: &[String]) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    Some(intersection as f64 / union as f64)
}

/// `(5 - |Δ|) / 5` averaged over the traits both members rated.
fn trait_similarity(a: &PersonalityTraits, b: &PersonalityTraits) -> Option<f64> {
    let scale = f64::from(PersonalityTraits::MAX);
    let parts: Vec<f64> = a
        .values()
        .into_iter()
        .zip(b.values())
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some((scale - f64::from(x.abs_diff(y))) / scale),
            _ => None,
        })
        .collect();

    mean(&parts)
}

fn mean(parts: &[f64]) -> Option<f64> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.iter().sum::<f64>() / parts.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weights::WeightConfig;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn jaccard_of_one_and_two_is_half() {
        let a = vec!["sci_fi_fantasy".to_string()];
        let b = vec!["sci_fi_fantasy".to_string(), "literature_fiction".to_string()];
        assert_eq!(jaccard(&a, &b), Some(0.5));
        assert_eq!(jaccard(&b, &a), Some(0.5));
    }

    #[test]
    fn jaccard_skips_empty_sides() {
        assert_eq!(jaccard(&[], &["x".to_string()]), None);
    }

    #[test]
    fn identical_traits_are_fully_similar() {
        let t = PersonalityTraits::uniform(4);
        assert_eq!(trait_similarity(&t, &t), Some(1.0));
    }

    #[test]
    fn trait_distance_uses_five_point_scale() {
        let a = PersonalityTraits::uniform(1);
        let b = PersonalityTraits::uniform(5);
        // (5 - 4) / 5
        assert!(approx(trait_similarity(&a, &b).unwrap(), 0.2));
    }

    #[test]
    fn trait_similarity_skips_unrated_traits() {
        let a = PersonalityTraits {
            openness: Some(3),
            ..Default::default()
        };
        let b = PersonalityTraits {
            openness: Some(5),
            extraversion: Some(1),
            ..Default::default()
        };
        assert!(approx(trait_similarity(&a, &b).unwrap(), 0.6));
        assert_eq!(trait_similarity(&PersonalityTraits::default(), &b), None);
    }

    #[test]
    fn major_partial_matches() {
        assert_eq!(major_similarity("physics", "physics"), 1.0);
        assert_eq!(major_similarity("applied physics", "physics"), 0.5);
        assert_eq!(major_similarity("computer science", "computer engineering"), 0.5);
        assert_eq!(major_similarity("history", "chemistry"), 0.0);
    }

    #[test]
    fn basic_similarity_averages_filled_fields() {
        let a = Questionnaire::default().with_basic_info("2", "History");
        let b = Questionnaire::default().with_basic_info("2", "Art History");
        assert!(approx(basic_similarity(&a, &b).unwrap(), 0.75));
        assert_eq!(basic_similarity(&a, &Questionnaire::default()), None);
    }

    #[test]
    fn weighted_normalises_by_applied_weights() {
        let weights = WeightConfig::default().traditional;
        let scores = TraditionalScores {
            reading: Some(0.5),
            ..Default::default()
        };
        assert!(approx(scores.weighted(&weights), 0.5));
        assert_eq!(TraditionalScores::default().weighted(&weights), 0.0);
    }

    #[test]
    fn complemented_keeps_basic() {
        let scores = TraditionalScores {
            basic: Some(1.0),
            reading: Some(0.25),
            interest: None,
            personality: Some(1.0),
        };
        let c = scores.complemented();
        assert_eq!(c.basic, Some(1.0));
        assert_eq!(c.reading, Some(0.75));
        assert_eq!(c.interest, None);
        assert_eq!(c.personality, Some(0.0));
    }

    #[test]
    fn to_score_rounds_and_clamps() {
        assert_eq!(to_score(0.0), 0);
        assert_eq!(to_score(0.44), 4);
        assert_eq!(to_score(0.46), 5);
        assert_eq!(to_score(1.3), 10);
        assert_eq!(to_score(-0.2), 0);
        assert_eq!(to_score(f64::NAN), 0);
    }
}
