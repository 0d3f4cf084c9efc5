//! Directory-backed blob store for development without network access

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::{read_upload_source, write_local_file};
use crate::domain::{BlobStore, StorageError};

/// Treats `root` as the bucket; keys map to relative file paths
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));

        if !is_plain {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, local_path: &Path, key: &str) -> Result<(), StorageError> {
        let bytes = read_upload_source(local_path).await?;
        self.upload_bytes(Bytes::from(bytes), key).await
    }

    async fn upload_bytes(&self, bytes: Bytes, key: &str) -> Result<(), StorageError> {
        let target = self.resolve(key)?;
        debug!(key = %key, path = %target.display(), size = bytes.len(), "Storing blob");
        write_local_file(&target, &bytes).await
    }

    async fn download(&self, key: &str, local_path: &Path) -> Result<(), StorageError> {
        let source = self.resolve(key)?;
        if !tokio::fs::try_exists(&source).await? {
            return Err(StorageError::not_found(key));
        }
        let bytes = tokio::fs::read(&source).await?;
        write_local_file(local_path, &bytes).await
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
