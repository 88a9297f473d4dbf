//! Data-completeness multiplier.
//!
//! Discounts AI-derived scores in proportion to how much confident AI signal
//! was available for the pair.

/// Implicit-preference confidences count slightly less than personality ones.
pub const IMPLICIT_CONFIDENCE_FACTOR: f64 = 0.8;

/// Completeness used when no confidence input is usable.
pub const DEFAULT_COMPLETENESS: f64 = 0.5;

/// Lift applied before capping at 1.0.
pub const COMPLETENESS_BONUS: f64 = 0.2;

/// Confidence inputs for one pair, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompletenessInputs {
    pub personality_a: f64,
    pub personality_b: f64,
    pub implicit_a: f64,
    pub implicit_b: f64,
    /// Recommendation confidence of the deep analysis, when one ran.
    pub deep_recommendation: Option<f64>,
}

impl CompletenessInputs {
    /// Multiplier in [0, 1]: `min(mean(usable inputs) + 0.2, 1.0)`.
    ///
    /// An input is usable when it is a positive finite number.
    pub fn multiplier(&self) -> f64 {
        let candidates = [
            Some(self.personality_a),
            Some(self.personality_b),
            Some(self.implicit_a * IMPLICIT_CONFIDENCE_FACTOR),
            Some(self.implicit_b * IMPLICIT_CONFIDENCE_FACTOR),
            self.deep_recommendation,
        ];

        let usable: Vec<f64> = candidates
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect();

        let completeness = if usable.is_empty() {
            DEFAULT_COMPLETENESS
        } else {
            usable.iter().sum::<f64>() / usable.len() as f64
        };

        (completeness + COMPLETENESS_BONUS).min(1.0)
    }
}
