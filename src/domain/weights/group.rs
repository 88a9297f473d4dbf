//! Weight groups and their validation rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Allowed deviation of a group's sum from 1.0.
pub const SUM_TOLERANCE: f64 = 0.01;

/// Factor names of the `traditional` group.
pub mod traditional {
    pub const BASIC: &str = "basic";
    pub const READING: &str = "reading";
    pub const INTEREST: &str = "interest";
    pub const PERSONALITY: &str = "personality";
}

/// Factor names of the `ai` group.
pub mod ai {
    pub const TRADITIONAL: &str = "traditional";
    pub const SEMANTIC: &str = "semantic";
}

/// Factor names of the `smart` group.
pub mod smart {
    pub const SIMILARITY: &str = "similarity";
    pub const COMPLEMENTARITY: &str = "complementarity";
}

/// Factor names of the `deep` group.
pub mod deep {
    pub const TRADITIONAL_SIMILARITY: &str = "traditional_similarity";
    pub const PERSONALITY_COMPATIBILITY: &str = "personality_compatibility";
    pub const IMPLICIT_RESONANCE: &str = "implicit_resonance";
    pub const GROWTH_POTENTIAL: &str = "growth_potential";
}

/// The four named weight groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightGroupName {
    Traditional,
    Ai,
    Smart,
    Deep,
}

impl WeightGroupName {
    pub const ALL: [WeightGroupName; 4] = [
        WeightGroupName::Traditional,
        WeightGroupName::Ai,
        WeightGroupName::Smart,
        WeightGroupName::Deep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightGroupName::Traditional => "traditional",
            WeightGroupName::Ai => "ai",
            WeightGroupName::Smart => "smart",
            WeightGroupName::Deep => "deep",
        }
    }

    /// Factor names a group of this kind must contain.
    pub fn factors(&self) -> &'static [&'static str] {
        match self {
            WeightGroupName::Traditional => &[
                traditional::BASIC,
                traditional::READING,
                traditional::INTEREST,
                traditional::PERSONALITY,
            ],
            WeightGroupName::Ai => &[ai::TRADITIONAL, ai::SEMANTIC],
            WeightGroupName::Smart => &[smart::SIMILARITY, smart::COMPLEMENTARITY],
            WeightGroupName::Deep => &[
                deep::TRADITIONAL_SIMILARITY,
                deep::PERSONALITY_COMPATIBILITY,
                deep::IMPLICIT_RESONANCE,
                deep::GROWTH_POTENTIAL,
            ],
        }
    }
}

impl fmt::Display for WeightGroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mapping of factor name to weight.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightGroup(BTreeMap<String, f64>);

impl WeightGroup {
    /// Builds a group from `(factor, weight)` pairs without validating it.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Weight of a factor; absent factors weigh nothing.
    pub fn weight(&self, factor: &str) -> f64 {
        self.0.get(factor).copied().unwrap_or(0.0)
    }

    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks the factor set, the per-factor range and the group sum.
    pub fn validate(&self, name: WeightGroupName) -> Result<(), ValidationError> {
        let expected = name.factors();

        for (factor, value) in self.iter() {
            if !expected.contains(&factor) {
                return Err(ValidationError::UnknownFactor {
                    group: name.to_string(),
                    factor: factor.to_string(),
                });
            }
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::out_of_range(
                    format!("{}.{}", name, factor),
                    0.0,
                    1.0,
                    value,
                ));
            }
        }

        if let Some(missing) = expected.iter().find(|f| !self.0.contains_key(**f)) {
            return Err(ValidationError::MissingFactor {
                group: name.to_string(),
                factor: missing.to_string(),
            });
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(ValidationError::WeightSum {
                group: name.to_string(),
                sum,
                tolerance: SUM_TOLERANCE,
            });
        }

        Ok(())
    }
}

/// The full live configuration: all four groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub traditional: WeightGroup,
    pub ai: WeightGroup,
    pub smart: WeightGroup,
    pub deep: WeightGroup,
}

impl WeightConfig {
    pub fn group(&self, name: WeightGroupName) -> &WeightGroup {
        match name {
            WeightGroupName::Traditional => &self.traditional,
            WeightGroupName::Ai => &self.ai,
            WeightGroupName::Smart => &self.smart,
            WeightGroupName::Deep => &self.deep,
        }
    }

    fn group_mut(&mut self, name: WeightGroupName) -> &mut WeightGroup {
        match name {
            WeightGroupName::Traditional => &mut self.traditional,
            WeightGroupName::Ai => &mut self.ai,
            WeightGroupName::Smart => &mut self.smart,
            WeightGroupName::Deep => &mut self.deep,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        WeightGroupName::ALL
            .iter()
            .try_for_each(|name| self.group(*name).validate(*name))
    }

    /// Returns a copy with every group present in `patch` replaced.
    pub(crate) fn merged(&self, patch: &WeightConfigPatch) -> Self {
        let mut next = self.clone();
        for (name, group) in patch.groups() {
            *next.group_mut(name) = group.clone();
        }
        next
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            traditional: WeightGroup::from_pairs([
                (traditional::BASIC, 0.2),
                (traditional::READING, 0.35),
                (traditional::INTEREST, 0.25),
                (traditional::PERSONALITY, 0.2),
            ]),
            ai: WeightGroup::from_pairs([(ai::TRADITIONAL, 0.6), (ai::SEMANTIC, 0.4)]),
            smart: WeightGroup::from_pairs([
                (smart::SIMILARITY, 0.6),
                (smart::COMPLEMENTARITY, 0.4),
            ]),
            deep: WeightGroup::from_pairs([
                (deep::TRADITIONAL_SIMILARITY, 0.25),
                (deep::PERSONALITY_COMPATIBILITY, 0.3),
                (deep::IMPLICIT_RESONANCE, 0.25),
                (deep::GROWTH_POTENTIAL, 0.2),
            ]),
        }
    }
}

/// Partial update: only the groups present are replaced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traditional: Option<WeightGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai: Option<WeightGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smart: Option<WeightGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep: Option<WeightGroup>,
}

impl WeightConfigPatch {
    /// A patch replacing a single group.
    pub fn single(name: WeightGroupName, group: WeightGroup) -> Self {
        let mut patch = Self::default();
        match name {
            WeightGroupName::Traditional => patch.traditional = Some(group),
            WeightGroupName::Ai => patch.ai = Some(group),
            WeightGroupName::Smart => patch.smart = Some(group),
            WeightGroupName::Deep => patch.deep = Some(group),
        }
        patch
    }

    /// Present groups with their names.
    pub fn groups(&self) -> impl Iterator<Item = (WeightGroupName, &WeightGroup)> {
        [
            (WeightGroupName::Traditional, self.traditional.as_ref()),
            (WeightGroupName::Ai, self.ai.as_ref()),
            (WeightGroupName::Smart, self.smart.as_ref()),
            (WeightGroupName::Deep, self.deep.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, group)| group.map(|g| (name, g)))
    }

    pub fn is_empty(&self) -> bool {
        self.groups().next().is_none()
    }

    /// Validates every present group; the first failure is returned.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.groups().try_for_each(|(name, group)| group.validate(name))
    }
}
