//! Survival Model Pipeline
//!
//! Column preprocessing followed by logistic regression, with evaluation
//! and artifact persistence.

mod classifier;
mod pipeline;
mod report;

pub use classifier::{ClassifierConfig, FittedClassifier};
pub use pipeline::{Coefficient, Coefficients, ModelPipeline, PipelineStatus, ARTIFACT_KIND};
pub use report::{AveragedMetrics, ClassMetrics, ClassificationReport};

use feature_engine::FeatureError;
use storage::ArtifactError;
use thiserror::Error;

/// Errors from fitting, predicting or persisting a pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error("Invalid training data: {0}")]
    InvalidTrainingData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Pipeline is not trained")]
    NotTrained,

    #[error("Pipeline is already trained; build a new one to retrain")]
    AlreadyTrained,

    #[error("Solver failed: {0}")]
    Solver(String),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl PipelineError {
    /// Whether the error was caused by the caller's input rather than
    /// pipeline state or storage
    pub fn is_invalid_input(&self) -> bool {
        match self {
            PipelineError::Feature(e) => !e.is_not_fitted(),
            PipelineError::InvalidTrainingData(_) | PipelineError::InvalidInput(_) => true,
            _ => false,
        }
    }
}
