//! Validated iris measurement vectors

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Column order shared by datasets, requests and fitted models
pub const FEATURE_NAMES: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// Four finite measurements in centimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; 4]);

impl FeatureVector {
    pub fn new(
        sepal_length: f64,
        sepal_width: f64,
        petal_length: f64,
        petal_width: f64,
    ) -> Result<Self, DomainError> {
        Self::from_array([sepal_length, sepal_width, petal_length, petal_width])
    }

    pub fn from_slice(values: &[f64]) -> Result<Self, DomainError> {
        let values: [f64; 4] = values.try_into().map_err(|_| {
            DomainError::invalid_input(format!(
                "Expected {} features, got {}",
                FEATURE_NAMES.len(),
                values.len()
            ))
        })?;
        Self::from_array(values)
    }

    fn from_array(values: [f64; 4]) -> Result<Self, DomainError> {
        if let Some(position) = values.iter().position(|value| !value.is_finite()) {
            return Err(DomainError::invalid_input(format!(
                "Feature '{}' must be a finite number",
                FEATURE_NAMES[position]
            )));
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64; 4] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_vector() {
        let features = FeatureVector::new(5.4, 3.4, 1.3, 0.2).unwrap();
        assert_eq!(features.values(), &[5.4, 3.4, 1.3, 0.2]);
        assert_eq!(features.to_vec(), vec![5.4, 3.4, 1.3, 0.2]);
    }

    #[test]
    fn test_wrong_arity() {
        let error = FeatureVector::from_slice(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(error, DomainError::InvalidInput { .. }));
        assert!(error.to_string().contains("got 3"));

        assert!(FeatureVector::from_slice(&[1.0; 5]).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let error = FeatureVector::new(5.0, f64::NAN, 1.0, 0.2).unwrap_err();
        assert!(error.to_string().contains("sepal_width"));

        assert!(FeatureVector::new(5.0, 3.0, f64::INFINITY, 0.2).is_err());
    }
}
