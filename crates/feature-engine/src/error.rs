//! Feature Engineering Error Types

use thiserror::Error;

/// Errors raised while building tables or fitting/applying transforms
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// A required column is not present in the input
    #[error("Column '{column}' not found in input. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A column has the wrong type for the step reading it
    #[error("Column '{column}' must be {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    /// Columns of a table disagree on row count
    #[error("Input is not tabular: column '{column}' has {actual} rows, expected {expected}")]
    Ragged {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// The same column name was added twice
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    /// A column holds a missing value where none is allowed
    #[error("Column '{column}' has a missing value at row {row}")]
    MissingValue { column: String, row: usize },

    /// A value is present but not acceptable
    #[error("Column '{column}' has invalid value {value} at row {row}: {reason}")]
    InvalidValue {
        column: String,
        row: usize,
        value: f64,
        reason: &'static str,
    },

    /// Nothing to learn a statistic from
    #[error("Column '{0}' has no observed values to fit on")]
    NoObservedValues(String),

    /// A column appears in more than one group, or a group name repeats
    #[error("Invalid preprocessor layout: {0}")]
    Layout(String),

    /// Input carries a column no group declares and the policy rejects it
    #[error("Unexpected column '{0}' is not claimed by any transform group")]
    UnexpectedColumn(String),

    /// Transform called before fit
    #[error("{0} is not fitted yet; call fit before transform")]
    NotFitted(&'static str),
}

impl FeatureError {
    /// True for the not-fitted state error, false for validation errors
    pub fn is_not_fitted(&self) -> bool {
        matches!(self, FeatureError::NotFitted(_))
    }
}
