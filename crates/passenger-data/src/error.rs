//! Dataset Error Types

use feature_engine::FeatureError;
use thiserror::Error;

/// Errors while reading, validating or splitting passenger data
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Value out of allowed range
    #[error("row {row}: {field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        row: usize,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value present but not one of the accepted forms
    #[error("row {row}: invalid {field} value '{value}'")]
    InvalidValue {
        row: usize,
        field: &'static str,
        value: String,
    },

    /// Missing required field
    #[error("row {row}: missing required field {field}")]
    MissingField { row: usize, field: &'static str },

    /// Records and labels disagree on length
    #[error("{records} records but {labels} labels")]
    LengthMismatch { records: usize, labels: usize },

    /// Dataset has no rows
    #[error("Dataset is empty")]
    Empty,

    /// Split fraction leaves a partition empty or is out of (0, 1)
    #[error("Invalid train/test split: {0}")]
    InvalidSplit(String),

    /// Dataset file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Remote dataset could not be fetched
    #[error("Failed to fetch dataset from {url}: {message}")]
    Fetch { url: String, message: String },

    /// Records could not be converted into a table
    #[error(transparent)]
    Feature(#[from] FeatureError),
}
