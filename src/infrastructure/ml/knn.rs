use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::metrics::distance::euclidian::Euclidian;
use smartcore::neighbors::knn_classifier::{KNNClassifier, KNNClassifierParameters};

use super::{fit_error, inference_error, to_matrix, Classifier, FitOptions};
use crate::domain::{Dataset, DomainError, ModelKind};

type Neighbors = KNNClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>, Euclidian<f64>>;

/// Majority vote of the nearest training samples
#[derive(Debug, Serialize, Deserialize)]
pub struct NeighborClassifier {
    model: Neighbors,
}

impl NeighborClassifier {
    pub fn fit(dataset: &Dataset, options: &FitOptions) -> Result<Self, DomainError> {
        let x = to_matrix(&dataset.records())?;
        let y = dataset.labels();
        // Lookups fail when k exceeds the number of stored samples
        let k = options.neighbors.min(dataset.len()).max(2);

        let model = Neighbors::fit(&x, &y, KNNClassifierParameters::default().with_k(k))
            .map_err(|e| fit_error(ModelKind::Knn, e))?;

        Ok(Self { model })
    }
}

impl Classifier for NeighborClassifier {
    fn predict_indices(&self, rows: &[Vec<f64>]) -> Result<Vec<u32>, DomainError> {
        let x = to_matrix(rows)?;
        self.model
            .predict(&x)
            .map_err(|e| inference_error(ModelKind::Knn, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DatasetOrigin;

    #[test]
    fn test_fit_and_predict_reference() {
        let knn = NeighborClassifier::fit(&Dataset::reference(), &FitOptions::default()).unwrap();

        let predictions = knn
            .predict_indices(&[vec![5.0, 3.4, 1.5, 0.2], vec![5.7, 2.8, 4.1, 1.3]])
            .unwrap();
        assert_eq!(predictions, vec![0, 1]);
    }

    #[test]
    fn test_small_dataset_clamps_neighbors() {
        let dataset = Dataset::from_csv(
            "5.1,3.5,1.4,0.2,setosa\n4.9,3.0,1.4,0.2,setosa\n6.3,3.3,6.0,2.5,virginica\n",
            DatasetOrigin::Reference,
        )
        .unwrap();

        let knn = NeighborClassifier::fit(&dataset, &FitOptions::default()).unwrap();
        let predictions = knn.predict_indices(&[vec![5.0, 3.2, 1.4, 0.2]]).unwrap();
        assert_eq!(predictions, vec![0]);
    }
}
