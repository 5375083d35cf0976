//! Model Inspection Route

use axum::{extract::State, Json};
use model_pipeline::{Coefficients, PipelineStatus};
use serde::Serialize;
use std::sync::Arc;
use storage::{ArtifactInfo, ArtifactStore};

use crate::error::{ApiError, Result};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub pipeline: String,
    pub status: PipelineStatus,
    pub coefficients: Option<Coefficients>,
    pub artifact: Option<ArtifactInfo>,
}

/// Fitted status, feature names and coefficients of the current model
pub async fn model(State(state): State<Arc<AppState>>) -> Result<Json<ModelResponse>> {
    let response = tokio::task::spawn_blocking(move || {
        let model = state
            .handle
            .get_or_load()
            .map_err(|e| ApiError::ModelUnavailable(e.to_string()))?;
        Ok::<_, ApiError>(ModelResponse {
            pipeline: model.to_string(),
            status: model.status(),
            coefficients: model.coefficients(),
            artifact: ArtifactStore::new(state.handle.artifact_path()).info().ok(),
        })
    })
    .await??;
    Ok(Json(response))
}
