//! File Weight Source Adapter
//!
//! Reads a weight document from disk on every fetch, so edits are picked up
//! by the next refresh. `.yaml` / `.yml` files are parsed as YAML, anything
//! else as JSON.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::weights::WeightConfigPatch;
use crate::ports::{WeightSource, WeightSourceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn for_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Weight source backed by a JSON or YAML file
#[derive(Debug, Clone)]
pub struct FileWeightSource {
    path: PathBuf,
    format: DocumentFormat,
}

impl FileWeightSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = DocumentFormat::for_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl WeightSource for FileWeightSource {
    async fn fetch(&self) -> Result<WeightConfigPatch, WeightSourceError> {
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|e| WeightSourceError::Unavailable(format!("{}: {}", self.path.display(), e)))?;

        match self.format {
            DocumentFormat::Json => serde_json::from_str(&raw)
                .map_err(|e| WeightSourceError::InvalidDocument(e.to_string())),
            DocumentFormat::Yaml => serde_yaml::from_str(&raw)
                .map_err(|e| WeightSourceError::InvalidDocument(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weights::smart;
    use tempfile::TempDir;

    #[tokio::test]
    async fn reads_partial_json_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weights.json");
        std::fs::write(&path, r#"{"smart": {"similarity": 0.5, "complementarity": 0.5}}"#).unwrap();

        let patch = FileWeightSource::new(&path).fetch().await.unwrap();

        assert!(patch.traditional.is_none());
        let smart_group = patch.smart.unwrap();
        assert_eq!(smart_group.weight(smart::SIMILARITY), 0.5);
    }

    #[tokio::test]
    async fn reads_yaml_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weights.yml");
        std::fs::write(&path, "ai:\n  traditional: 0.7\n  semantic: 0.3\n").unwrap();

        let patch = FileWeightSource::new(&path).fetch().await.unwrap();

        assert!(patch.ai.is_some());
        assert!(patch.validate().is_ok());
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = FileWeightSource::new(dir.path().join("nope.json"))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, WeightSourceError::Unavailable(_)));
    }

    #[tokio::test]
    async fn invalid_document_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weights.json");
        std::fs::write(&path, r#"{"deep": 3}"#).unwrap();

        let err = FileWeightSource::new(&path).fetch().await.unwrap_err();
        assert!(matches!(err, WeightSourceError::InvalidDocument(_)));
    }
}
