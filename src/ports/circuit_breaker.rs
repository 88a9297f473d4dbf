//! CircuitBreaker port - Gate in front of the AI analysis backend.
//!
//! The breaker protects the matching flow from a failing or slow AI
//! backend. It trips fast and recovers slowly:
//!
//! ## States
//!
//! - **Normal**: AI calls are allowed
//! - **Degraded**: AI calls are skipped, only traditional scoring runs
//!
//! ## Transitions
//!
//! ```text
//! Normal   --[consecutive errors >= degrade threshold]--> Degraded
//! Degraded --[consecutive errors == 0 AND cooldown elapsed, checked on success]--> Normal
//! ```
//!
//! Besides the gate, the breaker derives the batch size used by the match
//! selector from a sliding window of recent outcomes.

use std::time::Duration;

use serde::Serialize;

use crate::domain::foundation::Timestamp;

/// Circuit breaker states for the AI backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// AI calls flow through.
    Normal,

    /// Too many consecutive failures - AI calls are skipped.
    /// Leaves only after the cooldown and a clean success.
    Degraded,
}

impl CircuitState {
    /// Check if the circuit allows AI calls through.
    pub fn allows_requests(&self) -> bool {
        matches!(self, CircuitState::Normal)
    }
}

/// Configuration for circuit breaker behavior.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive errors that trip the circuit into Degraded.
    ///
    /// Default: 5 errors
    pub degrade_threshold: u32,

    /// Consecutive errors from which every further error shrinks the batch size by one.
    ///
    /// Default: 3 errors
    pub shrink_batch_threshold: u32,

    /// Minimum time spent in Degraded before recovery is considered.
    ///
    /// Default: 5 minutes
    pub recovery_cooldown: Duration,

    /// Capacity of the sliding outcome window.
    ///
    /// Default: 100 outcomes
    pub window_size: usize,

    /// Upper bound for the batch size.
    ///
    /// Default: 5
    pub max_batch_size: usize,

    /// Batch size at start, after recovery and after a forced reset.
    ///
    /// Default: 5
    pub initial_batch_size: usize,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            degrade_threshold: 5,
            shrink_batch_threshold: 3,
            recovery_cooldown: Duration::from_secs(300),
            window_size: 100,
            max_batch_size: 5,
            initial_batch_size: 5,
        }
    }
}

impl CircuitBreakerConfig {
    /// Sets the recovery cooldown.
    pub fn with_recovery_cooldown(mut self, cooldown: Duration) -> Self {
        self.recovery_cooldown = cooldown;
        self
    }

    /// Sets the degrade threshold.
    pub fn with_degrade_threshold(mut self, threshold: u32) -> Self {
        self.degrade_threshold = threshold.max(1);
        self
    }

    /// Initial batch size clamped into `[1, max_batch_size]`.
    pub fn clamped_initial_batch_size(&self) -> usize {
        self.initial_batch_size.clamp(1, self.max_batch_size.max(1))
    }
}

/// Port for the AI health gate.
///
/// This is the single authority consulted before any AI call. Every AI
/// attempt outcome must be reported back so the gate reflects the freshest
/// state for the next caller.
pub trait CircuitBreaker: Send + Sync {
    /// Get the current state of the circuit.
    fn state(&self) -> CircuitState;

    /// Check if AI calls should be made.
    fn should_use_ai(&self) -> bool {
        self.state().allows_requests()
    }

    /// Record a successful AI call.
    ///
    /// Resets the consecutive-error count and may end a Degraded period.
    fn record_success(&self);

    /// Record a failed AI call attempt.
    ///
    /// May trip the circuit and shrink the batch size.
    fn record_error(&self);

    /// Fraction of errors in the sliding window (lifetime ratio if the window is empty).
    fn error_rate(&self) -> f64;

    /// Batch size the match selector should use right now.
    fn dynamic_batch_size(&self) -> usize;

    /// Force reset all counters to their initial values.
    ///
    /// Use sparingly - typically for administrative intervention.
    fn force_reset(&self);

    /// Point-in-time view of the breaker for inspection.
    fn snapshot(&self) -> HealthSnapshot;
}

/// Metrics about circuit breaker behavior.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    /// Current state
    pub state: CircuitState,

    /// Errors since the last success
    pub consecutive_errors: u32,

    /// Total successful calls since creation or reset
    pub total_successes: u64,

    /// Total failed calls since creation or reset
    pub total_errors: u64,

    /// Number of outcomes currently in the sliding window
    pub window_len: usize,

    /// Error rate driving batch sizing
    pub error_rate: f64,

    /// Batch size after error-driven shrinking
    pub current_batch_size: usize,

    /// Times the circuit has entered Degraded
    pub times_degraded: u64,

    /// When the current Degraded period started
    pub degraded_since: Option<Timestamp>,

    /// Cooldown left before recovery is possible (when degraded)
    pub cooldown_remaining: Option<Duration>,
}
