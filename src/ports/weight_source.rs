//! Weight Source Port - External supplier of weight dictionaries.

use async_trait::async_trait;

use crate::domain::weights::WeightConfigPatch;

/// Errors that can occur while fetching weights
#[derive(Debug, thiserror::Error)]
pub enum WeightSourceError {
    #[error("Weight source unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid weight document: {0}")]
    InvalidDocument(String),
}

/// Port for fetching weight groups from configuration.
///
/// A source may return any subset of the four groups. Validation happens in
/// the [`WeightStore`](crate::domain::weights::WeightStore), not here.
#[async_trait]
pub trait WeightSource: Send + Sync {
    async fn fetch(&self) -> Result<WeightConfigPatch, WeightSourceError>;
}
