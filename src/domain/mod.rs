//! Domain layer - Core types and contracts

pub mod error;
pub mod model;
pub mod storage;

pub use error::DomainError;
pub use model::{
    Dataset, DatasetOrigin, DatasetSource, FeatureVector, ModelInfo, ModelKind, ModelStatus,
    Sample, Species, FEATURE_NAMES, LABEL_TABLE_VERSION,
};
pub use storage::{BlobStore, StorageError};
