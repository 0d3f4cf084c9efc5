use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

use super::{fit_error, inference_error, to_matrix, Classifier, FitOptions};
use crate::domain::{Dataset, DomainError, ModelKind};

type Forest = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Bagged decision-tree ensemble
#[derive(Debug, Serialize, Deserialize)]
pub struct ForestClassifier {
    model: Forest,
}

impl ForestClassifier {
    pub fn fit(dataset: &Dataset, options: &FitOptions) -> Result<Self, DomainError> {
        let x = to_matrix(&dataset.records())?;
        let y = dataset.labels();
        let parameters = RandomForestClassifierParameters::default()
            .with_n_trees(options.n_trees)
            .with_seed(options.seed);

        let model = Forest::fit(&x, &y, parameters)
            .map_err(|e| fit_error(ModelKind::RandomForest, e))?;

        Ok(Self { model })
    }
}

impl Classifier for ForestClassifier {
    fn predict_indices(&self, rows: &[Vec<f64>]) -> Result<Vec<u32>, DomainError> {
        let x = to_matrix(rows)?;
        self.model
            .predict(&x)
            .map_err(|e| inference_error(ModelKind::RandomForest, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_and_predict_reference() {
        let dataset = Dataset::reference();
        let forest = ForestClassifier::fit(&dataset, &FitOptions::default()).unwrap();

        let predictions = forest
            .predict_indices(&[vec![5.1, 3.5, 1.4, 0.2], vec![6.7, 3.0, 5.2, 2.3]])
            .unwrap();
        assert_eq!(predictions, vec![0, 2]);
    }
}
