//! API request, response and error types

pub mod error;
pub mod json;
pub mod model;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use model::{
    ModelInfoResponse, PredictRequest, PredictionResponse, RetrainQuery, RootResponse,
    StatusResponse, UploadResponse,
};
