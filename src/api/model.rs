//! Model endpoints: info, prediction and retraining

use axum::extract::{Query, State};
use tracing::info;

use super::state::AppState;
use super::types::{
    ApiError, Json, ModelInfoResponse, PredictRequest, PredictionResponse, RetrainQuery,
    RootResponse, StatusResponse,
};
use crate::domain::{DatasetSource, ModelKind};

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        msg: "Iris classifier is up and running!".to_string(),
    })
}

pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    Json(state.lifecycle.current_info().into())
}

pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let features = request.features()?;
    let prediction = state.lifecycle.predict(&features)?;

    Ok(Json(PredictionResponse { prediction }))
}

/// Retrains on the latest uploaded data and swaps the served model
pub async fn retrain(
    State(state): State<AppState>,
    Query(query): Query<RetrainQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let kind: ModelKind = query.model_type.parse()?;
    info!(model_type = %kind, "Retrain requested");

    state
        .lifecycle
        .train(
            DatasetSource::Blob {
                key: state.serving.data_key.clone(),
            },
            kind,
            state.serving.artifact_path(kind),
        )
        .await?;

    Ok(Json(StatusResponse {
        status: format!("Model retrained successfully with {}", kind),
    }))
}
