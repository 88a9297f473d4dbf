//! Application layer - Services that orchestrate the domain through ports.
//!
//! - `deep_analysis` - Retrying AI analyses with neutral fallbacks
//! - `compatibility_engine` - Scores one pair (cache, circuit breaker, AI path)
//! - `match_selector` - Batches the engine over a candidate list
//! - `weight_refresh` - Background reload of weight groups

pub mod compatibility_engine;
pub mod deep_analysis;
pub mod match_selector;
pub mod weight_refresh;

pub use compatibility_engine::{AnalysisDepth, CompatibilityEngine, EngineConfig, DEGRADED_REASON};
pub use deep_analysis::{AnalysisError, DeepAnalysisPipeline, PipelineConfig};
pub use match_selector::{BatchDelays, MatchCandidate, MatchError, MatchSelector, SelectorConfig};
pub use weight_refresh::{RefreshError, WeightRefresher, WeightRefresherConfig};
