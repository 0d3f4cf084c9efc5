//! Application state for shared services

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{BlobStore, ModelKind};
use crate::infrastructure::services::ModelLifecycleManager;
use crate::infrastructure::trigger::RetrainTrigger;

/// Request-independent settings the handlers need
#[derive(Debug, Clone)]
pub struct ServingSettings {
    /// Object key uploads overwrite and retraining reads
    pub data_key: String,
    /// Bucket reported in upload events
    pub bucket: String,
    pub model_dir: PathBuf,
    pub ui_dir: PathBuf,
}

impl ServingSettings {
    /// `<model_dir>/<kind>_model.bin`
    pub fn artifact_path(&self, kind: ModelKind) -> PathBuf {
        self.model_dir.join(kind.artifact_file_name())
    }
}

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<ModelLifecycleManager>,
    pub blob_store: Arc<dyn BlobStore>,
    /// Set when uploads should notify the retrain trigger
    pub trigger: Option<Arc<RetrainTrigger>>,
    pub serving: Arc<ServingSettings>,
}
