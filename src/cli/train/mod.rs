//! Train command - fits a model offline and writes its artifact

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{Dataset, DatasetOrigin, ModelKind};
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::ml::{FitOptions, ModelArtifact};

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// random_forest, svm or knn
    #[arg(long, default_value = "random_forest")]
    pub model_type: String,

    /// CSV with four measurement columns and a species column; defaults to
    /// the built-in reference dataset
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Artifact path; defaults to `<model.dir>/<model_type>_model.bin`
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub async fn run(args: TrainArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    let kind: ModelKind = args.model_type.parse()?;
    let dataset = match &args.data {
        Some(path) => read_dataset(path).await?,
        None => Dataset::reference(),
    };
    let output = args
        .output
        .unwrap_or_else(|| config.model.artifact_path(kind));
    let options = FitOptions::default().with_seed(config.model.seed);

    info!(
        kind = %kind,
        origin = %dataset.origin(),
        samples = dataset.len(),
        "Training model"
    );

    let report = tokio::task::spawn_blocking(move || train_and_save(kind, &dataset, &options, &output))
        .await
        .context("training task failed")??;

    println!(
        "Model trained with {}. Accuracy: {:.2}. Saved to {}",
        report.kind,
        report.accuracy,
        report.path.display()
    );

    Ok(())
}

struct TrainReport {
    kind: ModelKind,
    accuracy: f64,
    path: PathBuf,
}

fn train_and_save(
    kind: ModelKind,
    dataset: &Dataset,
    options: &FitOptions,
    output: &Path,
) -> anyhow::Result<TrainReport> {
    let artifact = ModelArtifact::fit(kind, dataset, options)?;
    let accuracy = artifact.accuracy(dataset)?;
    artifact.save(output)?;

    Ok(TrainReport {
        kind,
        accuracy,
        path: output.to_path_buf(),
    })
}

async fn read_dataset(path: &Path) -> anyhow::Result<Dataset> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read dataset {}", path.display()))?;

    Ok(Dataset::from_csv(
        &text,
        DatasetOrigin::File {
            path: path.to_path_buf(),
        },
    )?)
}
