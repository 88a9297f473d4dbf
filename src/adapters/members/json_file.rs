//! JSON File Member Store Adapter
//!
//! Reads and writes all member records as one JSON array on disk. A missing
//! file is an empty club, not an error.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::member::MemberProfile;
use crate::ports::{MemberStore, MemberStoreError};

/// File-backed member store
#[derive(Debug, Clone)]
pub struct JsonFileMemberStore {
    path: PathBuf,
}

impl JsonFileMemberStore {
    /// Create a store over the given file
    ///
    /// # Example
    /// ```ignore
    /// let store = JsonFileMemberStore::new("./data/members.json");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MemberStore for JsonFileMemberStore {
    async fn load_members(&self) -> Result<Vec<MemberProfile>, MemberStoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&self.path)
            .await
            .map_err(|e| MemberStoreError::IoError(e.to_string()))?;

        if json.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&json).map_err(|e| MemberStoreError::DeserializationFailed(e.to_string()))
    }

    async fn save_members(&self, members: &[MemberProfile]) -> Result<(), MemberStoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| MemberStoreError::IoError(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(members)
            .map_err(|e| MemberStoreError::SerializationFailed(e.to_string()))?;

        fs::write(&self.path, json)
            .await
            .map_err(|e| MemberStoreError::IoError(e.to_string()))
    }
}
