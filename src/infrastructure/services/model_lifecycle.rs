//! Model lifecycle - owns the current classifier and its load/train/predict cycle
//!
//! Predictions read the current artifact lock-free from an `ArcSwapOption`.
//! Trainings are serialized by an async mutex, fit on a blocking thread, and
//! publish the new artifact with a single store, so readers observe either the
//! previous model or the new one.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwapOption;
use tokio::sync::Mutex;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

use crate::domain::{
    BlobStore, Dataset, DatasetOrigin, DatasetSource, DomainError, FeatureVector, ModelInfo,
    ModelKind, Species,
};
use crate::infrastructure::ml::{FitOptions, ModelArtifact};
use crate::infrastructure::observability::{
    record_dataset_fallback, record_prediction, record_training, TrainingOutcome,
};

pub struct ModelLifecycleManager {
    current: ArcSwapOption<ModelArtifact>,
    train_lock: Mutex<()>,
    blob_store: Arc<dyn BlobStore>,
    options: FitOptions,
}

impl ModelLifecycleManager {
    pub fn new(blob_store: Arc<dyn BlobStore>, options: FitOptions) -> Self {
        Self {
            current: ArcSwapOption::empty(),
            train_lock: Mutex::new(()),
            blob_store,
            options,
        }
    }

    /// Loads a persisted artifact and makes it current.
    ///
    /// On failure the current model is left unchanged.
    pub async fn load(&self, path: &Path) -> Result<Arc<ModelArtifact>, DomainError> {
        let owned = path.to_path_buf();
        let artifact = tokio::task::spawn_blocking(move || ModelArtifact::load(&owned))
            .await
            .map_err(|e| DomainError::internal(format!("Model load task failed: {}", e)))??;

        info!(path = %path.display(), kind = %artifact.kind(), "Model loaded");
        Ok(self.publish(artifact))
    }

    /// Replaces the current model
    pub fn publish(&self, artifact: ModelArtifact) -> Arc<ModelArtifact> {
        let artifact = Arc::new(artifact);
        self.current.store(Some(Arc::clone(&artifact)));
        debug!(kind = %artifact.kind(), "Published model");
        artifact
    }

    /// Fits `kind` on the data behind `source`, persists it to `save_path`
    /// and makes it current.
    ///
    /// External data that cannot be fetched or parsed is replaced by the
    /// reference dataset. The training runs on its own task, so dropping the
    /// returned future does not abort it.
    pub async fn train(
        self: &Arc<Self>,
        source: DatasetSource,
        kind: ModelKind,
        save_path: PathBuf,
    ) -> Result<Arc<ModelArtifact>, DomainError> {
        let manager = Arc::clone(self);
        tokio::spawn(async move { manager.run_training(source, kind, save_path).await })
            .await
            .map_err(|e| DomainError::internal(format!("Training task failed: {}", e)))?
    }

    async fn run_training(
        &self,
        source: DatasetSource,
        kind: ModelKind,
        save_path: PathBuf,
    ) -> Result<Arc<ModelArtifact>, DomainError> {
        let _guard = self.train_lock.lock().await;
        let started = Instant::now();

        let dataset = self.resolve_dataset(&source).await;
        info!(
            kind = %kind,
            origin = %dataset.origin(),
            samples = dataset.len(),
            "Training model"
        );

        let options = self.options.clone();
        let target = save_path.clone();
        let fitted = tokio::task::spawn_blocking(move || {
            let artifact = ModelArtifact::fit(kind, &dataset, &options)?;
            artifact.save(&target)?;
            Ok::<_, DomainError>(artifact)
        })
        .await
        .map_err(fitting_join_error)
        .and_then(|result| result);

        match fitted {
            Ok(artifact) => {
                record_training(kind, TrainingOutcome::Success, started.elapsed());
                info!(
                    kind = %kind,
                    path = %save_path.display(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Model trained"
                );
                Ok(self.publish(artifact))
            }
            Err(e) => {
                record_training(kind, TrainingOutcome::Failure, started.elapsed());
                error!(kind = %kind, error = %e, "Model training failed");
                Err(e)
            }
        }
    }

    async fn resolve_dataset(&self, source: &DatasetSource) -> Dataset {
        match self.fetch_dataset(source).await {
            Ok(dataset) => dataset,
            Err(e) => {
                let reason = match e {
                    DomainError::Storage { .. } | DomainError::Configuration { .. } => "download",
                    DomainError::InvalidInput { .. } => "parse",
                    _ => "read",
                };
                warn!(
                    dataset = ?source,
                    reason = reason,
                    error = %e,
                    "Falling back to reference dataset"
                );
                record_dataset_fallback(reason);
                Dataset::reference()
            }
        }
    }

    async fn fetch_dataset(&self, source: &DatasetSource) -> Result<Dataset, DomainError> {
        let dataset = match source {
            DatasetSource::Reference => return Ok(Dataset::reference()),
            DatasetSource::File(path) => {
                let text = tokio::fs::read_to_string(path).await.map_err(|e| {
                    DomainError::internal(format!("Cannot read {}: {}", path.display(), e))
                })?;
                Dataset::from_csv(&text, DatasetOrigin::File { path: path.clone() })?
            }
            DatasetSource::Blob { key } => {
                let workdir = tempfile::tempdir()
                    .map_err(|e| DomainError::internal(format!("Cannot create temp dir: {}", e)))?;
                let local_path = workdir.path().join("dataset.csv");

                self.blob_store.download(key, &local_path).await?;
                debug!(backend = self.blob_store.name(), key = %key, "Dataset downloaded");

                let text = tokio::fs::read_to_string(&local_path).await.map_err(|e| {
                    DomainError::internal(format!("Cannot read downloaded dataset: {}", e))
                })?;
                Dataset::from_csv(&text, DatasetOrigin::Blob { key: key.clone() })?
            }
        };

        dataset.ensure_trainable()?;
        Ok(dataset)
    }

    /// Predicts with whichever model is current at call time
    pub fn predict(&self, features: &FeatureVector) -> Result<Species, DomainError> {
        let artifact = self.current.load_full().ok_or(DomainError::ModelNotLoaded)?;
        let species = artifact.predict(features)?;
        record_prediction(artifact.kind());
        Ok(species)
    }

    pub fn current_info(&self) -> ModelInfo {
        match &*self.current.load() {
            Some(artifact) => ModelInfo::loaded(artifact.kind()),
            None => ModelInfo::absent(),
        }
    }

    /// Startup policy: load the persisted `kind` artifact from `path`, and
    /// when that fails either train on the reference dataset or stay empty.
    pub async fn bootstrap(
        self: &Arc<Self>,
        path: &Path,
        kind: ModelKind,
        train_on_missing: bool,
    ) -> Result<ModelInfo, DomainError> {
        match self.load(path).await {
            Ok(_) => {}
            Err(e) if train_on_missing => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "No usable model on disk, training on reference dataset"
                );
                self.train(DatasetSource::Reference, kind, path.to_path_buf())
                    .await?;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Starting without a model");
            }
        }
        Ok(self.current_info())
    }
}

/// A panic while fitting is a training failure; a cancelled task is not
fn fitting_join_error(e: JoinError) -> DomainError {
    if e.is_panic() {
        DomainError::training(format!("Fitting panicked: {}", e))
    } else {
        DomainError::internal(format!("Fitting task failed: {}", e))
    }
}
