//! HealthMonitor - sliding-window health tracking for the AI backend.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::foundation::Timestamp;
use crate::ports::{CircuitBreaker, CircuitBreakerConfig, CircuitState, HealthSnapshot};

/// Error rate above which batches shrink to a single call.
const SINGLE_CALL_ERROR_RATE: f64 = 0.30;

/// Error rate above which batches are held at two or more.
const REDUCED_BATCH_ERROR_RATE: f64 = 0.10;

/// Tracks AI call outcomes and drives the Normal/Degraded circuit.
///
/// Owned by the application root and shared by handle with the pipeline,
/// the engine and the match selector. All state lives behind one mutex and
/// is only mutated through `record_success`, `record_error` and
/// `force_reset`.
#[derive(Debug)]
pub struct HealthMonitor {
    config: CircuitBreakerConfig,
    state: Mutex<HealthState>,
}

#[derive(Debug)]
struct HealthState {
    consecutive_errors: u32,
    total_successes: u64,
    total_errors: u64,
    /// `true` marks an error.
    window: VecDeque<bool>,
    degraded: bool,
    degraded_since: Option<Instant>,
    degraded_at: Option<Timestamp>,
    current_batch_size: usize,
    times_degraded: u64,
}

impl HealthState {
    fn initial(config: &CircuitBreakerConfig) -> Self {
        Self {
            consecutive_errors: 0,
            total_successes: 0,
            total_errors: 0,
            window: VecDeque::with_capacity(config.window_size),
            degraded: false,
            degraded_since: None,
            degraded_at: None,
            current_batch_size: config.clamped_initial_batch_size(),
            times_degraded: 0,
        }
    }

    fn push_outcome(&mut self, is_error: bool, capacity: usize) {
        if capacity == 0 {
            return;
        }
        while self.window.len() >= capacity {
            self.window.pop_front();
        }
        self.window.push_back(is_error);
    }

    fn error_rate(&self) -> f64 {
        if !self.window.is_empty() {
            let errors = self.window.iter().filter(|e| **e).count();
            return errors as f64 / self.window.len() as f64;
        }
        let total = self.total_successes + self.total_errors;
        if total == 0 {
            0.0
        } else {
            self.total_errors as f64 / total as f64
        }
    }
}

impl HealthMonitor {
    /// Creates a monitor with the given configuration.
    pub fn new(config: CircuitBreakerConfig) -> Self {
        let state = HealthState::initial(&config);
        Self {
            config,
            state: Mutex::new(state),
        }
    }

    /// Creates a monitor with default thresholds.
    pub fn with_defaults() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, HealthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_recover(&self, state: &mut HealthState) {
        if !state.degraded || state.consecutive_errors != 0 {
            return;
        }
        let cooled_down = state
            .degraded_since
            .map(|since| since.elapsed() >= self.config.recovery_cooldown)
            .unwrap_or(true);
        if !cooled_down {
            debug!("AI backend succeeded but recovery cooldown has not elapsed");
            return;
        }

        state.degraded = false;
        state.degraded_since = None;
        state.degraded_at = None;
        state.current_batch_size = self.config.clamped_initial_batch_size();
        info!(
            error_rate = state.error_rate(),
            batch_size = state.current_batch_size,
            "AI backend recovered, leaving degraded mode"
        );
    }

    fn try_degrade(&self, state: &mut HealthState) {
        if state.degraded || state.consecutive_errors < self.config.degrade_threshold {
            return;
        }
        state.degraded = true;
        state.degraded_since = Some(Instant::now());
        state.degraded_at = Some(Timestamp::now());
        state.times_degraded += 1;
        warn!(
            consecutive_errors = state.consecutive_errors,
            cooldown_secs = self.config.recovery_cooldown.as_secs(),
            "AI backend failing, entering degraded mode"
        );
    }
}

impl CircuitBreaker for HealthMonitor {
    fn state(&self) -> CircuitState {
        if self.lock().degraded {
            CircuitState::Degraded
        } else {
            CircuitState::Normal
        }
    }

    fn record_success(&self) {
        let mut state = self.lock();
        state.total_successes += 1;
        state.consecutive_errors = 0;
        state.push_outcome(false, self.config.window_size);
        self.try_recover(&mut state);
    }

    fn record_error(&self) {
        let mut state = self.lock();
        state.total_errors += 1;
        state.consecutive_errors += 1;
        state.push_outcome(true, self.config.window_size);
        self.try_degrade(&mut state);

        if state.consecutive_errors >= self.config.shrink_batch_threshold {
            let shrunk = state.current_batch_size.saturating_sub(1).max(1);
            if shrunk != state.current_batch_size {
                debug!(batch_size = shrunk, "Shrinking AI batch size");
            }
            state.current_batch_size = shrunk;
        }
    }

    fn error_rate(&self) -> f64 {
        self.lock().error_rate()
    }

    fn dynamic_batch_size(&self) -> usize {
        let state = self.lock();
        let rate = state.error_rate();
        let max = self.config.max_batch_size.max(1);

        let size = if rate > SINGLE_CALL_ERROR_RATE {
            1
        } else if rate > REDUCED_BATCH_ERROR_RATE {
            state.current_batch_size.max(2)
        } else {
            state.current_batch_size
        };
        size.clamp(1, max)
    }

    fn force_reset(&self) {
        let mut state = self.lock();
        *state = HealthState::initial(&self.config);
        info!("Health monitor force reset");
    }

    fn snapshot(&self) -> HealthSnapshot {
        let state = self.lock();
        let cooldown_remaining = state
            .degraded_since
            .map(|since| self.config.recovery_cooldown.saturating_sub(since.elapsed()));

        HealthSnapshot {
            state: if state.degraded {
                CircuitState::Degraded
            } else {
                CircuitState::Normal
            },
            consecutive_errors: state.consecutive_errors,
            total_successes: state.total_successes,
            total_errors: state.total_errors,
            window_len: state.window.len(),
            error_rate: state.error_rate(),
            current_batch_size: state.current_batch_size,
            times_degraded: state.times_degraded,
            degraded_since: state.degraded_at,
            cooldown_remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn monitor() -> HealthMonitor {
        HealthMonitor::with_defaults()
    }

    #[test]
    fn starts_normal_with_full_batch() {
        let m = monitor();
        assert!(m.should_use_ai());
        assert_eq!(m.error_rate(), 0.0);
        assert_eq!(m.dynamic_batch_size(), 5);
    }

    #[test]
    fn five_consecutive_errors_degrade() {
        let m = monitor();
        for _ in 0..4 {
            m.record_error();
        }
        assert!(m.should_use_ai());

        m.record_error();
        assert!(!m.should_use_ai());
        assert_eq!(m.state(), CircuitState::Degraded);
        assert_eq!(m.snapshot().times_degraded, 1);
    }

    #[test]
    fn a_success_breaks_the_error_streak() {
        let m = monitor();
        for _ in 0..4 {
            m.record_error();
        }
        m.record_success();
        for _ in 0..4 {
            m.record_error();
        }
        assert!(m.should_use_ai());
    }

    #[tokio::test(start_paused = true)]
    async fn success_before_cooldown_does_not_recover() {
        let m = monitor();
        for _ in 0..5 {
            m.record_error();
        }

        tokio::time::advance(Duration::from_secs(60)).await;
        m.record_success();

        assert_eq!(m.snapshot().consecutive_errors, 0);
        assert!(!m.should_use_ai());
        let remaining = m.snapshot().cooldown_remaining.unwrap();
        assert_eq!(remaining, Duration::from_secs(240));
    }

    #[tokio::test(start_paused = true)]
    async fn success_after_cooldown_recovers_and_restores_batch() {
        let m = monitor();
        for _ in 0..5 {
            m.record_error();
        }
        assert_eq!(m.snapshot().current_batch_size, 2);

        tokio::time::advance(Duration::from_secs(300)).await;
        assert!(!m.should_use_ai(), "recovery is only checked on success");

        m.record_success();
        assert!(m.should_use_ai());
        assert_eq!(m.snapshot().current_batch_size, 5);
        assert!(m.snapshot().degraded_since.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn error_after_cooldown_keeps_degraded() {
        let m = monitor();
        for _ in 0..5 {
            m.record_error();
        }
        tokio::time::advance(Duration::from_secs(301)).await;
        m.record_error();
        assert!(!m.should_use_ai());
    }

    #[test]
    fn batch_shrinks_from_third_consecutive_error_with_floor_one() {
        let m = monitor();
        m.record_error();
        m.record_error();
        assert_eq!(m.snapshot().current_batch_size, 5);

        m.record_error();
        assert_eq!(m.snapshot().current_batch_size, 4);

        for _ in 0..10 {
            m.record_error();
        }
        assert_eq!(m.snapshot().current_batch_size, 1);
    }

    #[test]
    fn window_is_capped_fifo() {
        let config = CircuitBreakerConfig {
            window_size: 10,
            ..Default::default()
        };
        let m = HealthMonitor::new(config);
        for _ in 0..10 {
            m.record_error();
        }
        m.force_reset();
        for _ in 0..4 {
            m.record_error();
            m.record_success();
        }
        for _ in 0..10 {
            m.record_success();
        }
        let snap = m.snapshot();
        assert_eq!(snap.window_len, 10);
        assert_eq!(snap.error_rate, 0.0);
        assert_eq!(snap.total_errors, 4);
    }

    #[test]
    fn error_rate_uses_window_not_lifetime() {
        let config = CircuitBreakerConfig {
            window_size: 4,
            ..Default::default()
        };
        let m = HealthMonitor::new(config);
        for _ in 0..4 {
            m.record_error();
        }
        for _ in 0..4 {
            m.record_success();
        }
        assert_eq!(m.error_rate(), 0.0);
        assert_eq!(m.snapshot().total_errors, 4);
    }

    #[test]
    fn high_error_rate_forces_single_call_batches() {
        let m = monitor();
        // 4 errors / 12 outcomes ≈ 0.33
        for _ in 0..6 {
            m.record_success();
        }
        for _ in 0..2 {
            m.record_error();
            m.record_success();
        }
        m.record_error();
        m.record_error();
        assert!(m.error_rate() > 0.30);
        assert_eq!(m.dynamic_batch_size(), 1);
    }

    #[test]
    fn moderate_error_rate_holds_at_least_two() {
        let m = monitor();
        for _ in 0..8 {
            m.record_success();
        }
        m.record_error();
        m.record_success();
        m.record_error();
        m.record_success();
        // 2 / 12 ≈ 0.17
        let rate = m.error_rate();
        assert!(rate > 0.10 && rate <= 0.30);
        assert_eq!(m.dynamic_batch_size(), 5);
    }

    #[test]
    fn batch_size_never_exceeds_max() {
        let config = CircuitBreakerConfig {
            max_batch_size: 3,
            initial_batch_size: 10,
            ..Default::default()
        };
        let m = HealthMonitor::new(config);
        assert_eq!(m.dynamic_batch_size(), 3);
        for _ in 0..50 {
            m.record_success();
            assert!(m.dynamic_batch_size() <= 3);
        }
    }

    #[test]
    fn force_reset_restores_initial_state() {
        let m = monitor();
        for _ in 0..7 {
            m.record_error();
        }
        assert!(!m.should_use_ai());

        m.force_reset();
        let snap = m.snapshot();
        assert!(m.should_use_ai());
        assert_eq!(snap.total_errors, 0);
        assert_eq!(snap.consecutive_errors, 0);
        assert_eq!(snap.window_len, 0);
        assert_eq!(snap.current_batch_size, 5);
        assert_eq!(snap.times_degraded, 0);
    }
}
