//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the matching domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::ValidationError;
pub use ids::MemberId;
pub use timestamp::Timestamp;
