//! WeightStore - live, validated weight configuration.
//!
//! The store is copy-on-write: every accepted update builds a new
//! [`WeightConfig`] and swaps the shared pointer, so readers holding an
//! `Arc` keep a consistent view while new reads see the replacement.
//!
//! Change notification goes through a `tokio::sync::watch` channel. Each
//! subscriber (the compatibility engine in practice) holds a receiver and
//! polls `has_changed()` to invalidate whatever it derived from the old
//! weights.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use super::group::{WeightConfig, WeightConfigPatch, WeightGroupName};
use crate::domain::foundation::ValidationError;

/// Holder of the four weight groups.
#[derive(Debug)]
pub struct WeightStore {
    tx: watch::Sender<Arc<WeightConfig>>,
}

impl WeightStore {
    /// Creates a store seeded with the default groups.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(WeightConfig::default()));
        Self { tx }
    }

    /// Creates a store seeded with a full configuration, validating every group.
    pub fn with_config(config: WeightConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        let (tx, _) = watch::channel(Arc::new(config));
        Ok(Self { tx })
    }

    /// Returns the live configuration.
    ///
    /// The returned snapshot never changes, but a later call may return a
    /// different one.
    pub fn get_weights(&self) -> Arc<WeightConfig> {
        self.tx.borrow().clone()
    }

    /// Validates and atomically applies a partial update.
    ///
    /// Nothing is applied unless every group in the patch is valid. An empty
    /// patch is accepted and does not notify subscribers.
    pub fn set_weights(&self, patch: WeightConfigPatch) -> Result<Arc<WeightConfig>, ValidationError> {
        if let Err(err) = patch.validate() {
            warn!(error = %err, "Rejected weight update");
            return Err(err);
        }

        if patch.is_empty() {
            return Ok(self.get_weights());
        }

        let groups: Vec<WeightGroupName> = patch.groups().map(|(name, _)| name).collect();
        self.tx.send_modify(|current| {
            *current = Arc::new(current.merged(&patch));
        });

        info!(groups = ?groups, subscribers = self.tx.receiver_count(), "Weight groups replaced");
        Ok(self.get_weights())
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> watch::Receiver<Arc<WeightConfig>> {
        self.tx.subscribe()
    }
}

impl Default for WeightStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weights::group::{deep, smart, traditional, WeightGroup};

    fn valid_smart() -> WeightGroup {
        WeightGroup::from_pairs([(smart::SIMILARITY, 0.3), (smart::COMPLEMENTARITY, 0.7)])
    }

    #[test]
    fn new_store_serves_defaults() {
        let store = WeightStore::new();
        assert_eq!(*store.get_weights(), WeightConfig::default());
    }

    #[test]
    fn set_weights_replaces_group_and_keeps_others() {
        let store = WeightStore::new();
        let before = store.get_weights();

        let after = store
            .set_weights(WeightConfigPatch::single(WeightGroupName::Smart, valid_smart()))
            .unwrap();

        assert_eq!(after.smart.weight(smart::COMPLEMENTARITY), 0.7);
        assert_eq!(after.traditional, before.traditional);
        // The old snapshot is untouched.
        assert_eq!(before.smart.weight(smart::COMPLEMENTARITY), 0.4);
    }

    #[test]
    fn invalid_group_rejects_whole_patch() {
        let store = WeightStore::new();
        let patch = WeightConfigPatch {
            smart: Some(valid_smart()),
            deep: Some(WeightGroup::from_pairs([
                (deep::TRADITIONAL_SIMILARITY, 0.5),
                (deep::PERSONALITY_COMPATIBILITY, 0.5),
                (deep::IMPLICIT_RESONANCE, 0.5),
                (deep::GROWTH_POTENTIAL, 0.5),
            ])),
            ..Default::default()
        };

        let err = store.set_weights(patch).unwrap_err();
        assert!(matches!(err, ValidationError::WeightSum { ref group, .. } if group == "deep"));
        assert_eq!(*store.get_weights(), WeightConfig::default());
    }

    #[test]
    fn subscribers_are_notified_on_change() {
        let store = WeightStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store
            .set_weights(WeightConfigPatch::single(WeightGroupName::Smart, valid_smart()))
            .unwrap();

        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.smart.weight(smart::SIMILARITY), 0.3);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn rejected_or_empty_update_does_not_notify() {
        let store = WeightStore::new();
        let mut rx = store.subscribe();

        let bad = WeightGroup::from_pairs([
            (traditional::BASIC, 1.0),
            (traditional::READING, 1.0),
            (traditional::INTEREST, 0.0),
            (traditional::PERSONALITY, 0.0),
        ]);
        assert!(store
            .set_weights(WeightConfigPatch::single(WeightGroupName::Traditional, bad))
            .is_err());
        assert!(store.set_weights(WeightConfigPatch::default()).is_ok());

        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn with_config_validates() {
        let mut config = WeightConfig::default();
        config.ai = WeightGroup::from_pairs([("traditional", 0.2), ("semantic", 0.2)]);
        assert!(WeightStore::with_config(config).is_err());
    }
}
