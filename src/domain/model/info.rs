use serde::{Deserialize, Serialize};

use super::ModelKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Loaded,
    Absent,
}

/// Snapshot of the current model slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub status: ModelStatus,
    pub kind: Option<ModelKind>,
}

impl ModelInfo {
    pub fn loaded(kind: ModelKind) -> Self {
        Self {
            status: ModelStatus::Loaded,
            kind: Some(kind),
        }
    }

    pub fn absent() -> Self {
        Self {
            status: ModelStatus::Absent,
            kind: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.status == ModelStatus::Loaded
    }
}
