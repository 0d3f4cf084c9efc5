//! Request and response bodies of the model endpoints

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, FeatureVector, ModelInfo, ModelKind, Species};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub msg: String,
}

/// Measurements submitted for classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PredictRequest {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

impl PredictRequest {
    pub fn features(&self) -> Result<FeatureVector, DomainError> {
        FeatureVector::new(
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: Species,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    pub status: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub model_type: Option<ModelKind>,
}

impl From<ModelInfo> for ModelInfoResponse {
    fn from(info: ModelInfo) -> Self {
        let status = if info.is_loaded() {
            "Model loaded"
        } else {
            "No model loaded"
        };

        Self {
            status: status.to_string(),
            model_type: info.kind,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrainQuery {
    #[serde(default = "default_model_type")]
    pub model_type: String,
}

fn default_model_type() -> String {
    ModelKind::RandomForest.as_str().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub filename: String,
}
