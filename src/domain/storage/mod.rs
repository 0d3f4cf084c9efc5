//! Storage domain - object-store gateway abstraction

mod error;
mod repository;

pub use error::StorageError;
pub use repository::BlobStore;

#[cfg(test)]
pub use repository::MockBlobStore;
