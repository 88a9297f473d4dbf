//! Domain layer containing matching logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `member` - Member profiles, questionnaire and gender-preference gate
//! - `weights` - The four weight groups and the `WeightStore`
//! - `health` - AI backend health tracking (`HealthMonitor`)
//! - `analysis` - AI analysis profiles, prompts and response sanitisation
//! - `compatibility` - Traditional scoring, match strategies and results

pub mod analysis;
pub mod compatibility;
pub mod foundation;
pub mod health;
pub mod member;
pub mod weights;
