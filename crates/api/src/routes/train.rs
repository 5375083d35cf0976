//! Training and Evaluation Routes

use axum::{extract::State, Json};
use model_pipeline::ClassificationReport;
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ClassificationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_rows: Option<usize>,
}

/// Train, persist and publish a new model. Failures are reported in the
/// message with status 200.
pub async fn train(State(state): State<Arc<AppState>>) -> Result<Json<TrainResponse>> {
    let result = tokio::task::spawn_blocking(move || state.training.run()).await?;

    let response = match (result.model(), result.error()) {
        (Some(model), _) => TrainResponse {
            message: format!("Pipeline built successfully {model}"),
            report: result.report().cloned(),
            train_rows: Some(result.train_rows()),
            test_rows: Some(result.test_rows()),
        },
        (None, error) => TrainResponse {
            message: format!("Error building pipeline {}", error.unwrap_or("unknown error")),
            report: None,
            train_rows: None,
            test_rows: None,
        },
    };
    Ok(Json(response))
}

/// Held-out metrics of the current model
pub async fn evaluate(State(state): State<Arc<AppState>>) -> Result<Json<ClassificationReport>> {
    let report = tokio::task::spawn_blocking(move || state.training.evaluate()).await??;
    Ok(Json(report))
}
