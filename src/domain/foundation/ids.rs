//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Student identifier of a reading club member.
///
/// Student ids are opaque strings issued by the member store; the only
/// invariant enforced here is that they are non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(String);

impl MemberId {
    /// Creates a new MemberId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("student_id"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MemberId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for MemberId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_accepts_non_empty_string() {
        let id = MemberId::new("2023001").unwrap();
        assert_eq!(id.as_str(), "2023001");
    }

    #[test]
    fn member_id_trims_whitespace() {
        let id = MemberId::new("  2023001 ").unwrap();
        assert_eq!(id.to_string(), "2023001");
    }

    #[test]
    fn member_id_rejects_empty_string() {
        match MemberId::new("   ") {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "student_id"),
            other => panic!("Expected EmptyField error, got {:?}", other),
        }
    }

    #[test]
    fn member_id_orders_lexicographically() {
        let a = MemberId::new("a").unwrap();
        let b = MemberId::new("b").unwrap();
        assert!(a < b);
    }

    #[test]
    fn member_id_deserialization_validates() {
        let ok: MemberId = serde_json::from_str("\"s-1\"").unwrap();
        assert_eq!(ok.as_str(), "s-1");
        assert!(serde_json::from_str::<MemberId>("\"\"").is_err());
    }
}
