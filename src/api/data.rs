//! Dataset upload endpoint

use std::sync::Arc;

use axum::extract::{Multipart, State};
use bytes::Bytes;
use tracing::{info, warn};

use super::state::AppState;
use super::types::{ApiError, Json, UploadResponse};
use crate::domain::DomainError;
use crate::infrastructure::trigger::{RetrainTrigger, UploadEvent};

/// Stores the first uploaded file under the canonical data key
pub async fn upload_data(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let content = field.bytes().await.map_err(|e| {
            ApiError::bad_request(format!("Failed to read file '{}': {}", filename, e))
        })?;
        upload = Some((filename, content));
        break;
    }

    let (filename, content) = upload.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
    if content.is_empty() {
        return Err(ApiError::bad_request(format!("File '{}' is empty", filename)));
    }

    let key = &state.serving.data_key;
    let size = content.len();
    state
        .blob_store
        .upload_bytes(content, key)
        .await
        .map_err(DomainError::from)?;

    info!(filename = %filename, key = %key, size, "Dataset uploaded");

    if let Some(trigger) = &state.trigger {
        spawn_retrain_trigger(
            Arc::clone(trigger),
            UploadEvent::for_object(state.serving.bucket.clone(), key.clone()),
        );
    }

    Ok(Json(UploadResponse {
        status: "success".to_string(),
        filename,
    }))
}

fn spawn_retrain_trigger(trigger: Arc<RetrainTrigger>, event: UploadEvent) {
    tokio::spawn(async move {
        match trigger.handle(&event).await {
            Ok(outcome) => info!(key = %outcome.key, "Retrain triggered after upload"),
            Err(e) => warn!(error = %e, "Retrain trigger after upload failed"),
        }
    });
}
