//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    ModelNotLoadedError,
    StorageError,
    TrainingError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::ModelNotLoadedError => write!(f, "model_not_loaded_error"),
            Self::StorageError => write!(f, "storage_error"),
            Self::TrainingError => write!(f, "training_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// Error body: `{"detail": "...", "type": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub detail: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, detail: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                detail: detail.into(),
                error_type,
            },
        }
    }

    /// Bad request error
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, detail)
    }

    /// Internal server error
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let detail = err.to_string();

        match err {
            _ if err.is_client_error() => Self::bad_request(detail),
            DomainError::ModelNotLoaded => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorType::ModelNotLoadedError,
                detail,
            ),
            DomainError::Storage { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorType::StorageError,
                detail,
            ),
            DomainError::Training { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorType::TrainingError,
                detail,
            ),
            _ => Self::internal(detail),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.response.error_type, self.response.detail)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("No file uploaded");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error_type, ApiErrorType::InvalidRequestError);
        assert_eq!(err.response.detail, "No file uploaded");
    }

    #[test]
    fn test_domain_error_conversion() {
        let api_err: ApiError = DomainError::unsupported_model_kind("xgboost").into();
        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);

        let api_err: ApiError = DomainError::ModelNotLoaded.into();
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.response.error_type, ApiErrorType::ModelNotLoadedError);
        assert_eq!(api_err.response.detail, "No model loaded");

        let api_err: ApiError = DomainError::storage("bucket unreachable").into();
        assert_eq!(api_err.response.error_type, ApiErrorType::StorageError);

        let api_err: ApiError = DomainError::training("fit diverged").into();
        assert_eq!(api_err.response.error_type, ApiErrorType::TrainingError);
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::internal("boom");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["detail"], "boom");
        assert_eq!(json["type"], "server_error");
    }

    #[test]
    fn test_all_error_statuses() {
        assert_eq!(ApiError::bad_request("").status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::internal("").status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
