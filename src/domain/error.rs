use thiserror::Error;

use super::storage::StorageError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to load model: {message}")]
    Load { message: String },

    #[error("Unsupported model type '{kind}'. Choose from: random_forest, svm, knn")]
    UnsupportedModelKind { kind: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Training failed: {message}")]
    Training { message: String },

    #[error("No model loaded")]
    ModelNotLoaded,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    pub fn unsupported_model_kind(kind: impl Into<String>) -> Self {
        Self::UnsupportedModelKind { kind: kind.into() }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn training(message: impl Into<String>) -> Self {
        Self::Training {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedModelKind { .. } | Self::InvalidInput { .. }
        )
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Configuration { message } => Self::configuration(message),
            other => Self::storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_model_kind_error() {
        let error = DomainError::unsupported_model_kind("xgboost");
        assert_eq!(
            error.to_string(),
            "Unsupported model type 'xgboost'. Choose from: random_forest, svm, knn"
        );
        assert!(error.is_client_error());
    }

    #[test]
    fn test_invalid_input_error() {
        let error = DomainError::invalid_input("expected 4 features, got 3");
        assert_eq!(error.to_string(), "Invalid input: expected 4 features, got 3");
        assert!(error.is_client_error());
    }

    #[test]
    fn test_model_not_loaded_is_server_side() {
        let error = DomainError::ModelNotLoaded;
        assert_eq!(error.to_string(), "No model loaded");
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_storage_error_conversion() {
        let error: DomainError = StorageError::Timeout { seconds: 5 }.into();
        assert!(matches!(error, DomainError::Storage { .. }));
        assert!(error.to_string().contains("timed out"));

        let error: DomainError = StorageError::configuration("bucket missing").into();
        assert!(matches!(error, DomainError::Configuration { .. }));
    }
}
