//! Blob store factory for runtime backend selection

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::domain::{BlobStore, StorageError};

use super::bounded::BoundedBlobStore;
use super::in_memory::InMemoryBlobStore;
use super::local::LocalBlobStore;
use super::s3::{S3BlobStore, S3Settings};

#[derive(Debug)]
pub struct BlobStoreFactory;

impl BlobStoreFactory {
    /// Builds the configured backend wrapped in the call timeout.
    ///
    /// S3 settings are validated here so a misconfigured process fails
    /// before it starts serving.
    pub async fn create(config: &StorageConfig) -> Result<Arc<dyn BlobStore>, StorageError> {
        if config.timeout_secs == 0 {
            return Err(StorageError::configuration(
                "storage.timeout_secs must be greater than zero",
            ));
        }

        let inner: Arc<dyn BlobStore> = match config.backend {
            StorageBackend::S3 => {
                let settings = S3Settings::from_config(config)?;
                Arc::new(S3BlobStore::new(settings).await)
            }
            StorageBackend::Local => Arc::new(LocalBlobStore::new(&config.local_dir)),
            StorageBackend::Memory => Arc::new(InMemoryBlobStore::new()),
        };

        info!(
            backend = inner.name(),
            timeout_secs = config.timeout_secs,
            "Blob store initialized"
        );

        Ok(Arc::new(BoundedBlobStore::new(
            inner,
            Duration::from_secs(config.timeout_secs),
        )))
    }
}
