//! Service Error Types

use model_pipeline::PipelineError;
use passenger_data::DatasetError;
use thiserror::Error;

/// Errors surfaced by the services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("No model available: {0}")]
    ModelUnavailable(String),

    #[error("Invalid passenger record: {0}")]
    InvalidRecord(String),
}

impl ServiceError {
    /// Whether the caller's input was at fault
    pub fn is_invalid_input(&self) -> bool {
        match self {
            ServiceError::InvalidRecord(_) => true,
            ServiceError::Pipeline(e) => e.is_invalid_input(),
            _ => false,
        }
    }

    /// Whether no trained model could be obtained
    pub fn is_model_unavailable(&self) -> bool {
        matches!(
            self,
            ServiceError::ModelUnavailable(_) | ServiceError::Pipeline(PipelineError::NotTrained)
        )
    }
}
