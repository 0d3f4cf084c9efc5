//! Retrain trigger - turns upload notifications into `POST /retrain` calls

mod client;
mod event;

use serde::Serialize;
use thiserror::Error;

pub use client::{RetrainTrigger, TriggerOutcome};
pub use event::{UploadEvent, UploadedObject};

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("Trigger configuration error: {0}")]
    Configuration(String),

    #[error("Invalid upload event: {0}")]
    InvalidEvent(String),

    #[error("Retrain request failed: {0}")]
    Transport(String),

    #[error("Retrain request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Retrain request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Invocation result in the `{statusCode, body}` shape of an event handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerReport {
    pub status_code: u16,
    pub body: String,
}

impl TriggerReport {
    pub fn from_result(result: &Result<TriggerOutcome, TriggerError>) -> Self {
        match result {
            Ok(outcome) => Self {
                status_code: 200,
                body: serde_json::json!({
                    "message": "Retraining triggered successfully",
                    "bucket": outcome.bucket,
                    "key": outcome.key,
                    "model_type": outcome.model_type,
                    "response": outcome.response,
                })
                .to_string(),
            },
            Err(e) => Self {
                status_code: 500,
                body: serde_json::json!({ "error": e.to_string() }).to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}
