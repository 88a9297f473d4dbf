//! Health module - AI backend health tracking and degradation.
//!
//! [`HealthMonitor`] implements the [`CircuitBreaker`](crate::ports::CircuitBreaker)
//! port. Construct one per application and hand it out by `Arc`.

mod monitor;

pub use monitor::HealthMonitor;
