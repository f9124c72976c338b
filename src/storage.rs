// src/storage.rs
//! File intake for uploaded CVs. Stored names are prefixed with a random
//! UUID so concurrent uploads of the same filename never collide.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create upload directory: {}", self.root.display()))
    }

    /// Copy an uploaded file into the store under a collision-resistant name.
    /// Returns the generated name; the full path is `resolve(name)`.
    pub async fn store(&self, source: &Path, original_name: &str) -> Result<String> {
        self.ensure_root().await?;

        let stored_name = format!("{}_{}", Uuid::new_v4(), original_name);
        let target = self.root.join(&stored_name);

        tokio::fs::copy(source, &target)
            .await
            .with_context(|| format!("Failed to store uploaded file: {}", target.display()))?;

        info!("Stored uploaded file as {}", stored_name);
        Ok(stored_name)
    }

    /// Full path of a previously stored file
    pub fn resolve(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_prefixes_and_copies() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("resume.pdf");
        tokio::fs::write(&source, b"%PDF-1.4 fake").await.unwrap();

        let store = FileStore::new(dir.path().join("uploads"));
        let name = store.store(&source, "resume.pdf").await.unwrap();

        assert!(name.ends_with("_resume.pdf"));
        assert_ne!(name, "resume.pdf");

        let stored = tokio::fs::read(store.resolve(&name)).await.unwrap();
        assert_eq!(stored, b"%PDF-1.4 fake");
    }

    #[tokio::test]
    async fn test_store_generates_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("cv.docx");
        tokio::fs::write(&source, b"doc").await.unwrap();

        let store = FileStore::new(dir.path().join("uploads"));
        let first = store.store(&source, "cv.docx").await.unwrap();
        let second = store.store(&source, "cv.docx").await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_store_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("uploads"));

        let result = store.store(&dir.path().join("absent.pdf"), "absent.pdf").await;
        assert!(result.is_err());
    }
}
