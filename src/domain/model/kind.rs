//! Supported classifier families

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Closed set of model kinds accepted by training and retraining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    RandomForest,
    Svm,
    Knn,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [Self::RandomForest, Self::Svm, Self::Knn];

    /// Wire name used in query strings, file names and responses
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RandomForest => "random_forest",
            Self::Svm => "svm",
            Self::Knn => "knn",
        }
    }

    pub fn family(self) -> &'static str {
        match self {
            Self::RandomForest => "ensemble-tree",
            Self::Svm => "margin-classifier",
            Self::Knn => "nearest-neighbor",
        }
    }

    /// `<kind>_model.bin`
    pub fn artifact_file_name(self) -> String {
        format!("{}_model.bin", self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| DomainError::unsupported_model_kind(s))
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!("random_forest".parse::<ModelKind>().unwrap(), ModelKind::RandomForest);
        assert_eq!("svm".parse::<ModelKind>().unwrap(), ModelKind::Svm);
        assert_eq!(" knn ".parse::<ModelKind>().unwrap(), ModelKind::Knn);
    }

    #[test]
    fn test_parse_unknown_kind() {
        let error = "xgboost".parse::<ModelKind>().unwrap_err();
        assert!(matches!(error, DomainError::UnsupportedModelKind { ref kind } if kind == "xgboost"));

        assert!("SVM".parse::<ModelKind>().is_err());
        assert!("".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_artifact_file_name() {
        assert_eq!(ModelKind::Svm.artifact_file_name(), "svm_model.bin");
        assert_eq!(
            ModelKind::RandomForest.artifact_file_name(),
            "random_forest_model.bin"
        );
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(
            serde_json::to_string(&ModelKind::RandomForest).unwrap(),
            "\"random_forest\""
        );
        let kind: ModelKind = serde_json::from_str("\"knn\"").unwrap();
        assert_eq!(kind, ModelKind::Knn);
    }
}
