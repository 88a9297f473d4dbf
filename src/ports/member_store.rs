//! Member Store Port - Read access to reading club member records.
//!
//! Member CRUD lives outside this crate; matching only loads records.
//! `save_members` exists so adapters can be seeded and round-tripped.

use async_trait::async_trait;

use crate::domain::foundation::MemberId;
use crate::domain::member::MemberProfile;

/// Errors that can occur during member store operations
#[derive(Debug, thiserror::Error)]
pub enum MemberStoreError {
    #[error("Member store unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Failed to serialize members: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize members: {0}")]
    DeserializationFailed(String),
}

/// Port for loading member profiles
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Load every member record.
    async fn load_members(&self) -> Result<Vec<MemberProfile>, MemberStoreError>;

    /// Replace every member record.
    async fn save_members(&self, members: &[MemberProfile]) -> Result<(), MemberStoreError>;

    /// Find one member by student id.
    async fn find_member(&self, id: &MemberId) -> Result<Option<MemberProfile>, MemberStoreError> {
        Ok(self
            .load_members()
            .await?
            .into_iter()
            .find(|m| &m.student_id == id))
    }
}
