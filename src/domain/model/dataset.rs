//! Labelled training data and its sources

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::reference::IRIS;
use super::{FeatureVector, Species};
use crate::domain::DomainError;

/// One labelled measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub features: FeatureVector,
    pub label: Species,
}

/// Where a dataset actually came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetOrigin {
    Reference,
    Blob { key: String },
    File { path: PathBuf },
}

impl fmt::Display for DatasetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => f.write_str("reference"),
            Self::Blob { key } => write!(f, "blob:{}", key),
            Self::File { path } => write!(f, "file:{}", path.display()),
        }
    }
}

/// Where a training run should look for data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Blob { key: String },
    File(PathBuf),
    Reference,
}

/// Ordered labelled samples
#[derive(Debug, Clone)]
pub struct Dataset {
    samples: Vec<Sample>,
    origin: DatasetOrigin,
}

impl Dataset {
    /// The built-in 150-row iris dataset
    pub fn reference() -> Self {
        let samples = IRIS
            .iter()
            .filter_map(|(values, index)| {
                Some(Sample {
                    features: FeatureVector::from_slice(values).ok()?,
                    label: Species::from_index(*index)?,
                })
            })
            .collect();

        Self {
            samples,
            origin: DatasetOrigin::Reference,
        }
    }

    /// Parses CSV text with four numeric columns followed by a label column.
    ///
    /// Blank lines and `#` comments are skipped. The first row is treated as a
    /// header when its measurement cells are not numeric.
    pub fn from_csv(text: &str, origin: DatasetOrigin) -> Result<Self, DomainError> {
        let mut samples = Vec::new();
        let mut first_row = true;

        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let is_first = std::mem::replace(&mut first_row, false);

            if fields.len() != 5 {
                if is_first && fields.iter().any(|f| f.parse::<f64>().is_err()) {
                    continue;
                }
                return Err(DomainError::invalid_input(format!(
                    "Line {}: expected 5 columns, got {}",
                    number + 1,
                    fields.len()
                )));
            }

            let values: Result<Vec<f64>, _> =
                fields[..4].iter().map(|field| field.parse::<f64>()).collect();
            let values = match values {
                Ok(values) => values,
                Err(_) if is_first => continue,
                Err(e) => {
                    return Err(DomainError::invalid_input(format!(
                        "Line {}: invalid measurement: {}",
                        number + 1,
                        e
                    )));
                }
            };

            let label = Species::parse(fields[4]).ok_or_else(|| {
                DomainError::invalid_input(format!(
                    "Line {}: unknown label '{}'",
                    number + 1,
                    fields[4]
                ))
            })?;

            let features = FeatureVector::from_slice(&values).map_err(|e| {
                DomainError::invalid_input(format!("Line {}: {}", number + 1, e))
            })?;

            samples.push(Sample { features, label });
        }

        if samples.is_empty() {
            return Err(DomainError::invalid_input("Dataset contains no samples"));
        }

        Ok(Self { samples, origin })
    }

    pub fn origin(&self) -> &DatasetOrigin {
        &self.origin
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Feature rows in sample order
    pub fn records(&self) -> Vec<Vec<f64>> {
        self.samples.iter().map(|s| s.features.to_vec()).collect()
    }

    /// Label-table indices in sample order
    pub fn labels(&self) -> Vec<u32> {
        self.samples.iter().map(|s| s.label.index()).collect()
    }

    pub fn classes(&self) -> BTreeSet<u32> {
        self.samples.iter().map(|s| s.label.index()).collect()
    }

    /// Fails unless the dataset has at least two distinct classes
    pub fn ensure_trainable(&self) -> Result<(), DomainError> {
        if self.classes().len() < 2 {
            return Err(DomainError::invalid_input(format!(
                "Dataset from {} needs at least 2 classes",
                self.origin
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_dataset() {
        let dataset = Dataset::reference();
        assert_eq!(dataset.len(), 150);
        assert_eq!(dataset.origin(), &DatasetOrigin::Reference);
        assert_eq!(dataset.classes().len(), 3);

        let labels = dataset.labels();
        assert_eq!(labels.iter().filter(|&&l| l == 0).count(), 50);
        assert_eq!(labels.iter().filter(|&&l| l == 1).count(), 50);
        assert_eq!(labels.iter().filter(|&&l| l == 2).count(), 50);
        assert!(dataset.ensure_trainable().is_ok());
    }

    #[test]
    fn test_csv_with_header_and_names() {
        let csv = "sepal_length,sepal_width,petal_length,petal_width,species\n\
                   5.1,3.5,1.4,0.2,setosa\n\
                   \n\
                   7.0,3.2,4.7,1.4,Iris-versicolor\n\
                   # comment\n\
                   6.3,3.3,6.0,2.5,2\n";
        let dataset = Dataset::from_csv(csv, DatasetOrigin::Blob {
            key: "iris_data.csv".to_string(),
        })
        .unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.labels(), vec![0, 1, 2]);
        assert_eq!(dataset.records()[1], vec![7.0, 3.2, 4.7, 1.4]);
    }

    #[test]
    fn test_csv_without_header() {
        let dataset =
            Dataset::from_csv("5.1,3.5,1.4,0.2,0\n4.9,3.0,1.4,0.2,0\n", DatasetOrigin::Reference)
                .unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.ensure_trainable().is_err());
    }

    #[test]
    fn test_csv_wrong_arity() {
        let error = Dataset::from_csv(
            "5.1,3.5,1.4,0.2,setosa\n5.1,3.5,1.4,setosa\n",
            DatasetOrigin::Reference,
        )
        .unwrap_err();
        assert!(error.to_string().contains("Line 2"));
    }

    #[test]
    fn test_csv_unknown_label_and_bad_number() {
        assert!(Dataset::from_csv("5.1,3.5,1.4,0.2,rose\n", DatasetOrigin::Reference).is_err());
        assert!(
            Dataset::from_csv(
                "5.1,3.5,1.4,0.2,setosa\n5.1,abc,1.4,0.2,setosa\n",
                DatasetOrigin::Reference
            )
            .is_err()
        );
    }

    #[test]
    fn test_csv_empty() {
        assert!(Dataset::from_csv("", DatasetOrigin::Reference).is_err());
        assert!(Dataset::from_csv("a,b,c,d,e\n", DatasetOrigin::Reference).is_err());
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(DatasetOrigin::Reference.to_string(), "reference");
        assert_eq!(
            DatasetOrigin::Blob {
                key: "iris_data.csv".to_string()
            }
            .to_string(),
            "blob:iris_data.csv"
        );
    }
}
