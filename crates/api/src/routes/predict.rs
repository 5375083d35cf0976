//! Prediction Route

use axum::{extract::State, Json};
use passenger_data::{Embarked, PassengerRecord, Pclass, Sex};
use serde::{Deserialize, Serialize};
use services::SurvivalOutcome;
use std::sync::Arc;

use crate::error::Result;
use crate::AppState;

/// Request body; every field is required
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictRequest {
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Fare")]
    pub fare: f64,
    #[serde(rename = "Sex")]
    pub sex: Sex,
    #[serde(rename = "Pclass")]
    pub pclass: Pclass,
    #[serde(rename = "Embarked")]
    pub embarked: Embarked,
    #[serde(rename = "SibSp")]
    pub sib_sp: u32,
    #[serde(rename = "Parch")]
    pub parch: u32,
}

impl From<PredictRequest> for PassengerRecord {
    fn from(request: PredictRequest) -> Self {
        PassengerRecord {
            age: Some(f64::from(request.age)),
            fare: request.fare,
            sex: request.sex,
            pclass: request.pclass,
            embarked: Some(request.embarked),
            sib_sp: request.sib_sp,
            parch: request.parch,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    #[serde(rename = "Did the person most likely survive")]
    pub survived: SurvivalOutcome,
}

/// Predict survival for one passenger
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>> {
    let record = PassengerRecord::from(request);
    let outcome = tokio::task::spawn_blocking(move || state.prediction.run(&record)).await??;
    Ok(Json(PredictResponse { survived: outcome }))
}
