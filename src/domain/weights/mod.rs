//! Weights module - The four coefficient groups used by scoring.
//!
//! - `traditional`: basic, reading, interest, personality
//! - `ai`: traditional, semantic
//! - `smart`: similarity, complementarity
//! - `deep`: traditional_similarity, personality_compatibility,
//!   implicit_resonance, growth_potential
//!
//! Every group sums to 1.0 ± 0.01 and every weight lies in [0, 1].

mod group;
mod store;

pub use group::{
    ai, deep, smart, traditional, WeightConfig, WeightConfigPatch, WeightGroup, WeightGroupName,
    SUM_TOLERANCE,
};
pub use store::WeightStore;
