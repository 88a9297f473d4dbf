//! Match strategies.
//!
//! Each strategy only decides how traditional sub-scores are combined into
//! a [0, 1] similarity. The AI and deep paths are shared by all of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::traditional::TraditionalScores;
use crate::domain::foundation::ValidationError;
use crate::domain::weights::{smart, WeightConfig};

/// Which kind of partner a member is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Readers with overlapping taste.
    #[default]
    Similar,
    /// Readers who would broaden each other's taste.
    Complementary,
    /// Blend of similar and complementary.
    Smart,
}

/// Combines traditional sub-scores under the current weights.
pub type TraditionalCombiner = fn(&TraditionalScores, &WeightConfig) -> f64;

const STRATEGIES: [(MatchType, TraditionalCombiner); 3] = [
    (MatchType::Similar, similar),
    (MatchType::Complementary, complementary),
    (MatchType::Smart, blended),
];

impl MatchType {
    pub const ALL: [MatchType; 3] = [MatchType::Similar, MatchType::Complementary, MatchType::Smart];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Similar => "similar",
            MatchType::Complementary => "complementary",
            MatchType::Smart => "smart",
        }
    }

    /// The traditional combination function for this match type.
    pub fn combiner(&self) -> TraditionalCombiner {
        STRATEGIES
            .iter()
            .find(|(match_type, _)| match_type == self)
            .map(|(_, combine)| *combine)
            .unwrap_or(similar)
    }

    /// Traditional similarity in [0, 1] for this match type.
    pub fn traditional_similarity(&self, scores: &TraditionalScores, weights: &WeightConfig) -> f64 {
        (self.combiner())(scores, weights)
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "similar" => Ok(MatchType::Similar),
            "complementary" => Ok(MatchType::Complementary),
            "smart" => Ok(MatchType::Smart),
            other => Err(ValidationError::invalid_format(
                "match_type",
                format!("unknown match type '{}'", other),
            )),
        }
    }
}

fn similar(scores: &TraditionalScores, weights: &WeightConfig) -> f64 {
    scores.weighted(&weights.traditional)
}

fn complementary(scores: &TraditionalScores, weights: &WeightConfig) -> f64 {
    scores.complemented().weighted(&weights.traditional)
}

fn blended(scores: &TraditionalScores, weights: &WeightConfig) -> f64 {
    let ws = weights.smart.weight(smart::SIMILARITY);
    let wc = weights.smart.weight(smart::COMPLEMENTARITY);
    let total = ws + wc;
    if total <= 0.0 {
        return similar(scores, weights);
    }

    ((ws * similar(scores, weights) + wc * complementary(scores, weights)) / total).clamp(0.0, 1.0)
}
