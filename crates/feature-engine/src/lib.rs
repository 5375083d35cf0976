//! Feature Engineering Engine
//!
//! Tabular input, fitted preprocessing steps, and the column-wise
//! preprocessor that turns passenger tables into model-ready matrices.

mod encoder;
mod error;
mod family;
mod imputer;
mod matrix;
mod preprocessor;
mod scaler;
mod statistics;
mod table;

pub use encoder::OneHotEncoder;
pub use error::FeatureError;
pub use family::{FamilyFeatureDeriver, SeenColumns, FAMILY_SIZE, IS_ALONE};
pub use imputer::MedianImputer;
pub use matrix::FeatureMatrix;
pub use preprocessor::{
    ColumnGroup, ColumnPreprocessor, GroupStatus, GroupTransform, PassThrough, StepStatus,
    TransformKind, UnknownColumns,
};
pub use scaler::{ScalerParams, StandardScaler};
pub use statistics::ColumnStatistics;
pub use table::{Column, Table};
