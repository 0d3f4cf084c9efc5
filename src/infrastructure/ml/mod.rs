//! Classifier fitting and persisted model artifacts (smartcore backed)

mod artifact;
mod forest;
mod knn;
mod svm;

use smartcore::error::Failed;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::domain::{DomainError, ModelKind};

pub use artifact::{ArtifactMetadata, FittedClassifier, ModelArtifact};
pub use forest::ForestClassifier;
pub use knn::NeighborClassifier;
pub use svm::MarginClassifier;

/// Hyper-parameters shared by the three model kinds
#[derive(Debug, Clone)]
pub struct FitOptions {
    pub seed: u64,
    pub n_trees: u16,
    pub neighbors: usize,
    pub svm_c: f64,
    pub svm_gamma: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            n_trees: 100,
            neighbors: 5,
            svm_c: 1.0,
            svm_gamma: 0.7,
        }
    }
}

impl FitOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Inference over label-table indices
pub trait Classifier {
    fn predict_indices(&self, rows: &[Vec<f64>]) -> Result<Vec<u32>, DomainError>;
}

pub(crate) fn to_matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>, DomainError> {
    DenseMatrix::from_2d_vec(&rows.to_vec())
        .map_err(|e| DomainError::invalid_input(format!("Invalid feature matrix: {}", e)))
}

pub(crate) fn fit_error(kind: ModelKind, err: Failed) -> DomainError {
    DomainError::training(format!("{} fit failed: {}", kind, err))
}

pub(crate) fn inference_error(kind: ModelKind, err: Failed) -> DomainError {
    DomainError::internal(format!("{} inference failed: {}", kind, err))
}
