//! Training and Prediction Services
//!
//! Orchestrates dataset loading, pipeline training, persistence and
//! prediction around a shared [`ModelHandle`].

mod error;
mod handle;
mod prediction;
mod training;

pub use error::ServiceError;
pub use handle::ModelHandle;
pub use prediction::{PredictionService, SurvivalOutcome};
pub use training::{TrainingResult, TrainingService, TrainingSettings};
