//! Typed failures of the object-store gateway

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by every [`BlobStore`](super::BlobStore) backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage configuration error: {message}")]
    Configuration { message: String },

    #[error("Local file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Object not found: {key}")]
    NotFound { key: String },

    #[error("Invalid object key: {key}")]
    InvalidKey { key: String },

    #[error("Storage transport error: {message}")]
    Transport { message: String },

    #[error("Storage operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }
}
