//! In-Memory Member Store Adapter
//!
//! Holds member records in memory. Useful for testing and development.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::member::MemberProfile;
use crate::ports::{MemberStore, MemberStoreError};

/// In-memory member store
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberStore {
    members: Arc<RwLock<Vec<MemberProfile>>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with members
    pub fn with_members(members: Vec<MemberProfile>) -> Self {
        Self {
            members: Arc::new(RwLock::new(members)),
        }
    }

    /// Get the number of stored members
    pub async fn member_count(&self) -> usize {
        self.members.read().await.len()
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn load_members(&self) -> Result<Vec<MemberProfile>, MemberStoreError> {
        Ok(self.members.read().await.clone())
    }

    async fn save_members(&self, members: &[MemberProfile]) -> Result<(), MemberStoreError> {
        *self.members.write().await = members.to_vec();
        Ok(())
    }
}
