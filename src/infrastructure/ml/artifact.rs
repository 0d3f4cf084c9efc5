//! Fitted model plus metadata, persisted as a single bincode file

use std::io::Write;
use std::path::Path;

use bincode::Options;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::{Classifier, FitOptions, ForestClassifier, MarginClassifier, NeighborClassifier};
use crate::domain::{
    Dataset, DatasetOrigin, DomainError, FeatureVector, ModelKind, Species, LABEL_TABLE_VERSION,
};

/// Upper bound on artifact size accepted by encode and decode
const MAX_ARTIFACT_BYTES: u64 = 64 * 1024 * 1024;

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_ARTIFACT_BYTES)
}

/// A fitted classifier of one of the supported kinds
#[derive(Debug, Serialize, Deserialize)]
pub enum FittedClassifier {
    Forest(ForestClassifier),
    Svm(MarginClassifier),
    Knn(NeighborClassifier),
}

impl FittedClassifier {
    pub fn fit(
        kind: ModelKind,
        dataset: &Dataset,
        options: &FitOptions,
    ) -> Result<Self, DomainError> {
        match kind {
            ModelKind::RandomForest => ForestClassifier::fit(dataset, options).map(Self::Forest),
            ModelKind::Svm => MarginClassifier::fit(dataset, options).map(Self::Svm),
            ModelKind::Knn => NeighborClassifier::fit(dataset, options).map(Self::Knn),
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Forest(_) => ModelKind::RandomForest,
            Self::Svm(_) => ModelKind::Svm,
            Self::Knn(_) => ModelKind::Knn,
        }
    }
}

impl Classifier for FittedClassifier {
    fn predict_indices(&self, rows: &[Vec<f64>]) -> Result<Vec<u32>, DomainError> {
        match self {
            Self::Forest(model) => model.predict_indices(rows),
            Self::Svm(model) => model.predict_indices(rows),
            Self::Knn(model) => model.predict_indices(rows),
        }
    }
}

/// Provenance recorded alongside every fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub kind: ModelKind,
    pub label_table_version: u32,
    pub training_samples: usize,
    pub dataset_origin: DatasetOrigin,
    pub trained_at: DateTime<Utc>,
}

/// Immutable fitted model shared between requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    metadata: ArtifactMetadata,
    classifier: FittedClassifier,
}

impl ModelArtifact {
    /// Fits `kind` on the whole dataset
    pub fn fit(
        kind: ModelKind,
        dataset: &Dataset,
        options: &FitOptions,
    ) -> Result<Self, DomainError> {
        dataset.ensure_trainable()?;
        let classifier = FittedClassifier::fit(kind, dataset, options)?;

        Ok(Self {
            metadata: ArtifactMetadata {
                kind,
                label_table_version: LABEL_TABLE_VERSION,
                training_samples: dataset.len(),
                dataset_origin: dataset.origin().clone(),
                trained_at: Utc::now(),
            },
            classifier,
        })
    }

    pub fn kind(&self) -> ModelKind {
        self.metadata.kind
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<Species, DomainError> {
        self.predict_batch(std::slice::from_ref(features))?
            .pop()
            .ok_or_else(|| DomainError::internal("Classifier returned no prediction"))
    }

    pub fn predict_batch(&self, features: &[FeatureVector]) -> Result<Vec<Species>, DomainError> {
        if features.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<Vec<f64>> = features.iter().map(FeatureVector::to_vec).collect();
        self.classifier
            .predict_indices(&rows)?
            .into_iter()
            .map(|index| {
                Species::from_index(index).ok_or_else(|| {
                    DomainError::internal(format!("Classifier produced unknown class {}", index))
                })
            })
            .collect()
    }

    /// Fraction of samples predicted correctly
    pub fn accuracy(&self, dataset: &Dataset) -> Result<f64, DomainError> {
        if dataset.is_empty() {
            return Err(DomainError::invalid_input("Cannot score an empty dataset"));
        }

        let features: Vec<FeatureVector> = dataset.samples().iter().map(|s| s.features).collect();
        let predictions = self.predict_batch(&features)?;
        let correct = predictions
            .iter()
            .zip(dataset.samples())
            .filter(|(predicted, sample)| **predicted == sample.label)
            .count();

        Ok(correct as f64 / dataset.len() as f64)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DomainError> {
        codec()
            .serialize(self)
            .map_err(|e| DomainError::internal(format!("Failed to encode model: {}", e)))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        let artifact: Self = codec()
            .deserialize(bytes)
            .map_err(|e| DomainError::load(format!("Corrupt model artifact: {}", e)))?;

        if artifact.metadata.label_table_version != LABEL_TABLE_VERSION {
            return Err(DomainError::load(format!(
                "Model was fitted with label table v{}, expected v{}",
                artifact.metadata.label_table_version, LABEL_TABLE_VERSION
            )));
        }
        if artifact.metadata.kind != artifact.classifier.kind() {
            return Err(DomainError::load(format!(
                "Model metadata says {} but contains a {} classifier",
                artifact.metadata.kind,
                artifact.classifier.kind()
            )));
        }

        Ok(artifact)
    }

    /// Writes the artifact next to `path` and renames it into place
    pub fn save(&self, path: &Path) -> Result<(), DomainError> {
        let bytes = self.to_bytes()?;
        let persist_error =
            |e: std::io::Error| DomainError::internal(format!("Failed to write {}: {}", path.display(), e));

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(persist_error)?;

        let mut file = NamedTempFile::new_in(parent).map_err(persist_error)?;
        file.write_all(&bytes).map_err(persist_error)?;
        file.as_file().sync_all().map_err(persist_error)?;
        file.persist(path).map_err(|e| persist_error(e.error))?;

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, DomainError> {
        let bytes = std::fs::read(path)
            .map_err(|e| DomainError::load(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setosa() -> FeatureVector {
        FeatureVector::new(5.4, 3.4, 1.3, 0.2).unwrap()
    }

    #[test]
    fn test_random_forest_reference_accuracy() {
        let dataset = Dataset::reference();
        let artifact =
            ModelArtifact::fit(ModelKind::RandomForest, &dataset, &FitOptions::default()).unwrap();

        assert_eq!(artifact.kind(), ModelKind::RandomForest);
        assert_eq!(artifact.metadata().training_samples, 150);
        assert_eq!(artifact.metadata().dataset_origin, DatasetOrigin::Reference);
        assert!(artifact.accuracy(&dataset).unwrap() >= 0.9);
        assert_eq!(artifact.predict(&setosa()).unwrap(), Species::Setosa);
    }

    #[test]
    fn test_svm_and_knn_reference_accuracy() {
        let dataset = Dataset::reference();
        for kind in [ModelKind::Svm, ModelKind::Knn] {
            let artifact = ModelArtifact::fit(kind, &dataset, &FitOptions::default()).unwrap();
            assert_eq!(artifact.kind(), kind);
            assert!(artifact.accuracy(&dataset).unwrap() >= 0.8, "{} accuracy", kind);
        }
    }

    #[test]
    fn test_save_and_load_preserve_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Dataset::reference();
        let features: Vec<FeatureVector> = dataset.samples().iter().map(|s| s.features).collect();

        for kind in ModelKind::ALL {
            let path = dir.path().join("nested").join(kind.artifact_file_name());
            let artifact = ModelArtifact::fit(kind, &dataset, &FitOptions::default()).unwrap();
            artifact.save(&path).unwrap();

            let loaded = ModelArtifact::load(&path).unwrap();
            assert_eq!(loaded.metadata(), artifact.metadata());
            assert_eq!(
                loaded.predict_batch(&features).unwrap(),
                artifact.predict_batch(&features).unwrap()
            );
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = ModelArtifact::load(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(error, DomainError::Load { .. }));
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.bin");
        std::fs::write(&path, b"definitely not a model").unwrap();

        let error = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(error, DomainError::Load { .. }));
    }

    #[test]
    fn test_label_table_mismatch_rejected() {
        let mut artifact =
            ModelArtifact::fit(ModelKind::Knn, &Dataset::reference(), &FitOptions::default())
                .unwrap();
        artifact.metadata.label_table_version = LABEL_TABLE_VERSION + 1;
        let bytes = artifact.to_bytes().unwrap();

        let error = ModelArtifact::from_bytes(&bytes).unwrap_err();
        assert!(error.to_string().contains("label table"));
    }

    #[test]
    fn test_empty_batch() {
        let artifact =
            ModelArtifact::fit(ModelKind::Knn, &Dataset::reference(), &FitOptions::default())
                .unwrap();
        assert!(artifact.predict_batch(&[]).unwrap().is_empty());
    }
}
