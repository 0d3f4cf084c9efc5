//! One-vs-one margin classifier built from binary smartcore SVCs.
//!
//! A fitted smartcore `SVC` borrows its parameters and cannot be restored from
//! disk, so each pairwise machine is snapshotted into owned support vectors,
//! weights and bias at fit time. The decision function is evaluated here with
//! the same kernel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smartcore::error::{Failed, FailedError};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::svm::svc::{SVCParameters, SVC};
use smartcore::svm::{Kernel, Kernels};

use super::{fit_error, inference_error, to_matrix, Classifier, FitOptions};
use crate::domain::{Dataset, DomainError, ModelKind, FEATURE_NAMES};

type BinarySvc<'a> = SVC<'a, f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// smartcore's optimizer truncates support vectors to the row count, so a
/// pair needs at least as many rows as there are features
const MIN_PAIR_ROWS: usize = FEATURE_NAMES.len();

/// Serialized shape of a fitted binary `SVC`
#[derive(Deserialize)]
struct SvcState {
    classes: Option<(u32, u32)>,
    instances: Option<Vec<Vec<f64>>>,
    w: Option<Vec<f64>>,
    b: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PairwiseMachine {
    negative: u32,
    positive: u32,
    support_vectors: Vec<Vec<f64>>,
    weights: Vec<f64>,
    bias: f64,
}

impl PairwiseMachine {
    fn snapshot(svc: &BinarySvc<'_>) -> Result<Self, DomainError> {
        let state: SvcState = serde_json::to_value(svc)
            .and_then(serde_json::from_value)
            .map_err(|e| DomainError::training(format!("Failed to capture svm state: {}", e)))?;

        let missing = |field: &str| DomainError::training(format!("Fitted svm has no {}", field));
        let (negative, positive) = state.classes.ok_or_else(|| missing("classes"))?;
        let support_vectors = state.instances.ok_or_else(|| missing("support vectors"))?;
        let weights = state.w.ok_or_else(|| missing("weights"))?;
        let bias = state.b.ok_or_else(|| missing("bias"))?;

        if weights.len() != support_vectors.len() {
            return Err(DomainError::training(format!(
                "Fitted svm has {} weights for {} support vectors",
                weights.len(),
                support_vectors.len()
            )));
        }

        if let Some(vector) = support_vectors
            .iter()
            .find(|v| v.len() != FEATURE_NAMES.len())
        {
            return Err(DomainError::training(format!(
                "Fitted svm has a support vector with {} values, expected {}",
                vector.len(),
                FEATURE_NAMES.len()
            )));
        }

        Ok(Self {
            negative,
            positive,
            support_vectors,
            weights,
            bias,
        })
    }

    fn decision(&self, kernel: &Kernels, row: &Vec<f64>) -> Result<f64, Failed> {
        self.support_vectors
            .iter()
            .zip(&self.weights)
            .try_fold(self.bias, |acc, (vector, weight)| -> Result<f64, Failed> {
                // smartcore's kernels assert on mismatched lengths
                if vector.len() != row.len() {
                    return Err(Failed::because(
                        FailedError::PredictFailed,
                        "support vector width does not match the input",
                    ));
                }
                Ok(acc + weight * kernel.apply(row, vector)?)
            })
    }

    fn vote(&self, kernel: &Kernels, row: &Vec<f64>) -> Result<u32, Failed> {
        if self.decision(kernel, row)? > 0.0 {
            Ok(self.positive)
        } else {
            Ok(self.negative)
        }
    }
}

/// RBF-kernel support vector classifier over all class pairs
#[derive(Debug, Serialize, Deserialize)]
pub struct MarginClassifier {
    kernel: Kernels,
    machines: Vec<PairwiseMachine>,
}

impl MarginClassifier {
    pub fn fit(dataset: &Dataset, options: &FitOptions) -> Result<Self, DomainError> {
        dataset.ensure_trainable()?;

        let kernel = Kernels::rbf().with_gamma(options.svm_gamma);
        let parameters = SVCParameters::<f64, u32, DenseMatrix<f64>, Vec<u32>>::default()
            .with_c(options.svm_c)
            .with_kernel(kernel.clone())
            .with_seed(Some(options.seed));

        let records = dataset.records();
        let labels = dataset.labels();
        let classes: Vec<u32> = dataset.classes().into_iter().collect();
        let mut machines = Vec::new();

        for (i, &negative) in classes.iter().enumerate() {
            for &positive in &classes[i + 1..] {
                let (rows, targets): (Vec<Vec<f64>>, Vec<u32>) = records
                    .iter()
                    .zip(&labels)
                    .filter(|(_, label)| **label == negative || **label == positive)
                    .map(|(row, label)| (row.clone(), *label))
                    .unzip();

                if rows.len() < MIN_PAIR_ROWS {
                    return Err(DomainError::training(format!(
                        "svm needs at least {} rows for classes {} and {}, got {}",
                        MIN_PAIR_ROWS,
                        negative,
                        positive,
                        rows.len()
                    )));
                }

                let x = to_matrix(&rows)?;
                let svc = BinarySvc::fit(&x, &targets, &parameters)
                    .map_err(|e| fit_error(ModelKind::Svm, e))?;
                machines.push(PairwiseMachine::snapshot(&svc)?);
            }
        }

        Ok(Self { kernel, machines })
    }

    fn predict_row(&self, row: &Vec<f64>) -> Result<u32, DomainError> {
        let mut votes: BTreeMap<u32, usize> = BTreeMap::new();
        for machine in &self.machines {
            let class = machine
                .vote(&self.kernel, row)
                .map_err(|e| inference_error(ModelKind::Svm, e))?;
            *votes.entry(class).or_default() += 1;
        }

        // Ties go to the lowest class index
        let mut best: Option<(u32, usize)> = None;
        for (class, count) in votes {
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((class, count));
            }
        }

        best.map(|(class, _)| class)
            .ok_or_else(|| DomainError::internal("Margin classifier has no fitted machines"))
    }
}

impl Classifier for MarginClassifier {
    fn predict_indices(&self, rows: &[Vec<f64>]) -> Result<Vec<u32>, DomainError> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }
}
