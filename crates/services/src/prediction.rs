//! Prediction Service

use crate::error::ServiceError;
use crate::handle::ModelHandle;
use model_pipeline::PipelineError;
use passenger_data::{to_table, PassengerRecord, Validator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Human-readable survival prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurvivalOutcome {
    Yes,
    No,
}

impl SurvivalOutcome {
    /// Map a classifier label; `1` means survived
    pub fn from_label(label: usize) -> Self {
        if label == 1 {
            SurvivalOutcome::Yes
        } else {
            SurvivalOutcome::No
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SurvivalOutcome::Yes => "yes",
            SurvivalOutcome::No => "no",
        }
    }
}

impl fmt::Display for SurvivalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicts survival for single passengers with the shared model
pub struct PredictionService {
    handle: Arc<ModelHandle>,
    validator: Validator,
}

impl PredictionService {
    pub fn new(handle: Arc<ModelHandle>) -> Self {
        Self {
            handle,
            validator: Validator::default(),
        }
    }

    /// Predict whether `record` most likely survived
    pub fn run(&self, record: &PassengerRecord) -> Result<SurvivalOutcome, ServiceError> {
        self.validator
            .validate_record(0, record)
            .map_err(|e| ServiceError::InvalidRecord(e.to_string()))?;

        let model = self.handle.get_or_load().map_err(|e| match e {
            PipelineError::Artifact(e) => ServiceError::ModelUnavailable(e.to_string()),
            other => ServiceError::Pipeline(other),
        })?;

        let table = to_table(std::slice::from_ref(record)).map_err(PipelineError::from)?;
        let label = model.predict(&table)?.first().copied().ok_or_else(|| {
            ServiceError::Pipeline(PipelineError::InvalidInput("no prediction returned".to_string()))
        })?;

        let outcome = SurvivalOutcome::from_label(label);
        metrics::counter!("titanic_predictions_total", "outcome" => outcome.as_str()).increment(1);
        debug!(outcome = %outcome, "Prediction");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::{TrainingService, TrainingSettings};
    use passenger_data::{synthetic_manifest, write_csv, DatasetSource, Embarked, Pclass, Sex};

    fn passenger(age: f64, sex: Sex, pclass: Pclass, fare: f64) -> PassengerRecord {
        PassengerRecord {
            age: Some(age),
            fare,
            sex,
            pclass,
            embarked: Some(Embarked::Southampton),
            sib_sp: 0,
            parch: 0,
        }
    }

    fn trained_handle(dir: &std::path::Path) -> Arc<ModelHandle> {
        let csv = dir.join("train.csv");
        write_csv(&csv, &synthetic_manifest(400, 21)).unwrap();
        let handle = Arc::new(ModelHandle::new(dir.join("model.bin")));
        let result = TrainingService::new(TrainingSettings::new(DatasetSource::Local(csv)), Arc::clone(&handle)).run();
        assert!(result.success(), "{:?}", result.error());
        handle
    }

    #[test]
    fn test_first_class_woman_survives() {
        let dir = tempfile::tempdir().unwrap();
        let service = PredictionService::new(trained_handle(dir.path()));

        let outcome = service.run(&passenger(29.0, Sex::Female, Pclass::First, 211.5)).unwrap();
        assert_eq!(outcome, SurvivalOutcome::Yes);
    }

    #[test]
    fn test_loads_artifact_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        trained_handle(dir.path());

        let fresh = Arc::new(ModelHandle::new(dir.path().join("model.bin")));
        assert!(!fresh.is_loaded());
        let service = PredictionService::new(Arc::clone(&fresh));
        service.run(&passenger(22.0, Sex::Male, Pclass::Third, 7.25)).unwrap();
        assert!(fresh.is_loaded());
    }

    #[test]
    fn test_no_model_available() {
        let dir = tempfile::tempdir().unwrap();
        let service = PredictionService::new(Arc::new(ModelHandle::new(dir.path().join("model.bin"))));
        let err = service.run(&passenger(29.0, Sex::Female, Pclass::First, 211.5)).unwrap_err();
        assert!(err.is_model_unavailable());
    }

    #[test]
    fn test_out_of_range_record() {
        let dir = tempfile::tempdir().unwrap();
        let service = PredictionService::new(trained_handle(dir.path()));
        let err = service.run(&passenger(-3.0, Sex::Male, Pclass::Third, 7.25)).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRecord(_)));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_outcome_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SurvivalOutcome::Yes).unwrap(), "\"yes\"");
        assert_eq!(SurvivalOutcome::from_label(0), SurvivalOutcome::No);
    }
}
