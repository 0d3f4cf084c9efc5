//! Iris classifier serving API
//!
//! Trains random forest, SVM and k-NN classifiers on the iris dataset,
//! persists them to disk and serves predictions over HTTP with:
//! - Hot model swaps on retrain
//! - Dataset uploads to S3-compatible object storage
//! - Upload-driven retrain triggering

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AppState, ServingSettings};
use infrastructure::{
    ml::FitOptions,
    services::ModelLifecycleManager,
    storage::BlobStoreFactory,
    trigger::RetrainTrigger,
};
use tracing::info;

/// Create the application state: storage, lifecycle manager with its startup
/// model, and the optional retrain trigger
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let blob_store = BlobStoreFactory::create(&config.storage).await?;
    info!(backend = blob_store.name(), "Storage backend ready");

    let options = FitOptions::default().with_seed(config.model.seed);
    let lifecycle = Arc::new(ModelLifecycleManager::new(Arc::clone(&blob_store), options));

    let kind = config.model.default_kind;
    let model = lifecycle
        .bootstrap(
            &config.model.artifact_path(kind),
            kind,
            config.model.train_on_missing,
        )
        .await?;
    info!(status = ?model.status, kind = ?model.kind, "Model bootstrap complete");

    let trigger = if config.trigger.enabled {
        let trigger = RetrainTrigger::new(&config.trigger)?;
        info!(url = %trigger.retrain_url(), "Retrain trigger enabled");
        Some(Arc::new(trigger))
    } else {
        None
    };

    let serving = ServingSettings {
        data_key: config.storage.data_key.clone(),
        bucket: config
            .storage
            .bucket
            .clone()
            .unwrap_or_else(|| blob_store.name().to_string()),
        model_dir: config.model.dir.clone(),
        ui_dir: config.server.ui_dir.clone(),
    };

    Ok(AppState {
        lifecycle,
        blob_store,
        trigger,
        serving: Arc::new(serving),
    })
}
