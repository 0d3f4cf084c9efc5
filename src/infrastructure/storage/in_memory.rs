//! In-memory blob store

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::{read_upload_source, write_local_file};
use crate::domain::{BlobStore, StorageError};

/// Thread-safe in-process bucket
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one blob
    pub fn with_blob(key: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let mut blobs = HashMap::new();
        blobs.insert(key.into(), bytes.into());
        Self {
            blobs: RwLock::new(blobs),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Bytes> {
        self.blobs.read().await.get(key).cloned()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(&self, local_path: &Path, key: &str) -> Result<(), StorageError> {
        let bytes = read_upload_source(local_path).await?;
        self.upload_bytes(Bytes::from(bytes), key).await
    }

    async fn upload_bytes(&self, bytes: Bytes, key: &str) -> Result<(), StorageError> {
        self.blobs.write().await.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn download(&self, key: &str, local_path: &Path) -> Result<(), StorageError> {
        let bytes = self
            .get(key)
            .await
            .ok_or_else(|| StorageError::not_found(key))?;
        write_local_file(local_path, &bytes).await
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_overwrites_and_download() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryBlobStore::new();

        store.upload_bytes(Bytes::from_static(b"first"), "iris_data.csv").await.unwrap();
        store.upload_bytes(Bytes::from_static(b"second"), "iris_data.csv").await.unwrap();

        let target = dir.path().join("out").join("iris.csv");
        store.download("iris_data.csv", &target).await.unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_upload_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("data.csv");
        std::fs::write(&source, "5.1,3.5,1.4,0.2,setosa\n").unwrap();

        let store = InMemoryBlobStore::new();
        store.upload(&source, "iris_data.csv").await.unwrap();
        assert_eq!(
            store.get("iris_data.csv").await.unwrap(),
            Bytes::from_static(b"5.1,3.5,1.4,0.2,setosa\n")
        );
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let store = InMemoryBlobStore::new();
        let error = store
            .upload(Path::new("/nonexistent/iris.csv"), "iris_data.csv")
            .await
            .unwrap_err();
        assert!(matches!(error, StorageError::MissingFile { .. }));
    }

    #[tokio::test]
    async fn test_download_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryBlobStore::new();
        let error = store
            .download("missing.csv", &dir.path().join("x.csv"))
            .await
            .unwrap_err();
        assert!(matches!(error, StorageError::NotFound { .. }));
    }
}
