//! WeightRefresher - Background service that keeps weights in sync with
//! their external source.
//!
//! Every tick the refresher fetches a weight document and applies it through
//! [`WeightStore::set_weights`], so a document that fails validation is
//! rejected as a whole and the live weights stay untouched. Accepted updates
//! reach the compatibility engine through the store's change channel.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `poll_interval` | 60s | How often to fetch the weight document |
//!
//! ## Graceful Shutdown
//!
//! The service listens for a shutdown signal and stops after the current
//! refresh completes.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use crate::domain::foundation::ValidationError;
use crate::domain::weights::WeightStore;
use crate::ports::{WeightSource, WeightSourceError};

/// Why a refresh did not change the weights.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Source(#[from] WeightSourceError),

    #[error("weight document rejected: {0}")]
    Rejected(#[from] ValidationError),
}

/// Configuration for the WeightRefresher service.
#[derive(Debug, Clone)]
pub struct WeightRefresherConfig {
    /// How often to fetch the weight document.
    pub poll_interval: Duration,
}

impl Default for WeightRefresherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
        }
    }
}

impl WeightRefresherConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Polls a [`WeightSource`] and pushes its groups into the [`WeightStore`].
pub struct WeightRefresher {
    source: Arc<dyn WeightSource>,
    store: Arc<WeightStore>,
    config: WeightRefresherConfig,
}

impl WeightRefresher {
    pub fn new(source: Arc<dyn WeightSource>, store: Arc<WeightStore>) -> Self {
        Self::with_config(source, store, WeightRefresherConfig::default())
    }

    pub fn with_config(
        source: Arc<dyn WeightSource>,
        store: Arc<WeightStore>,
        config: WeightRefresherConfig,
    ) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    /// Run the refresh loop until the shutdown signal is received.
    ///
    /// Failed refreshes are logged and retried on the next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Weight refresher stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    if let Err(e) = self.refresh_once().await {
                        warn!(error = %e, "Weight refresh failed, keeping current weights");
                    }
                }
            }
        }
    }

    /// Fetch and apply the weight document once.
    ///
    /// Returns `true` when the store accepted at least one group.
    pub async fn refresh_once(&self) -> Result<bool, RefreshError> {
        let patch = self.source.fetch().await?;

        if patch.is_empty() {
            debug!("Weight document has no groups");
            return Ok(false);
        }

        let current = self.store.get_weights();
        if patch.groups().all(|(name, group)| current.group(name) == group) {
            debug!("Weight document unchanged");
            return Ok(false);
        }

        self.store.set_weights(patch)?;
        Ok(true)
    }
}
