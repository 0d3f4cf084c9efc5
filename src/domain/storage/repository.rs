//! Blob store trait definition

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;

#[cfg(test)]
use mockall::automock;

use super::StorageError;

/// Named-blob storage in a single bucket. Uploads overwrite existing keys.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads the file at `local_path` under `key`
    async fn upload(&self, local_path: &Path, key: &str) -> Result<(), StorageError>;

    /// Uploads an in-memory payload under `key`
    async fn upload_bytes(&self, bytes: Bytes, key: &str) -> Result<(), StorageError>;

    /// Downloads `key` into `local_path`, replacing any existing file
    async fn download(&self, key: &str, local_path: &Path) -> Result<(), StorageError>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}
