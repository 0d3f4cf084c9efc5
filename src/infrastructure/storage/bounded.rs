//! Timeout decorator applied to every blob store call

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::warn;

use crate::domain::{BlobStore, StorageError};

pub struct BoundedBlobStore {
    inner: Arc<dyn BlobStore>,
    timeout: Duration,
}

impl BoundedBlobStore {
    pub fn new(inner: Arc<dyn BlobStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<F>(&self, operation: &str, key: &str, call: F) -> Result<(), StorageError>
    where
        F: Future<Output = Result<(), StorageError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    backend = self.inner.name(),
                    operation = operation,
                    key = %key,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Storage call timed out"
                );
                Err(StorageError::Timeout {
                    seconds: self.timeout.as_secs(),
                })
            }
        }
    }
}

#[async_trait]
impl BlobStore for BoundedBlobStore {
    async fn upload(&self, local_path: &Path, key: &str) -> Result<(), StorageError> {
        self.bounded("upload", key, self.inner.upload(local_path, key))
            .await
    }

    async fn upload_bytes(&self, bytes: Bytes, key: &str) -> Result<(), StorageError> {
        self.bounded("upload", key, self.inner.upload_bytes(bytes, key))
            .await
    }

    async fn download(&self, key: &str, local_path: &Path) -> Result<(), StorageError> {
        self.bounded("download", key, self.inner.download(key, local_path))
            .await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
