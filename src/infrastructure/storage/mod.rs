//! Storage infrastructure - object-store gateway backends

mod bounded;
mod factory;
mod in_memory;
mod local;
mod s3;

use std::path::Path;

pub use bounded::BoundedBlobStore;
pub use factory::BlobStoreFactory;
pub use in_memory::InMemoryBlobStore;
pub use local::LocalBlobStore;
pub use s3::{S3BlobStore, S3Settings};

use crate::domain::StorageError;

/// Writes a downloaded payload, creating parent directories
pub(crate) async fn write_local_file(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Reads a file that is about to be uploaded
pub(crate) async fn read_upload_source(path: &Path) -> Result<Vec<u8>, StorageError> {
    if !tokio::fs::try_exists(path).await? {
        return Err(StorageError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    Ok(tokio::fs::read(path).await?)
}
