//! Titanic Column Layout
//!
//! Converts typed records into the preprocessor's table input and builds the
//! canonical five-group preprocessor.

use crate::record::PassengerRecord;
use feature_engine::{Column, ColumnGroup, ColumnPreprocessor, FeatureError, GroupTransform, Table};

pub const AGE: &str = "Age";
pub const FARE: &str = "Fare";
pub const SEX: &str = "Sex";
pub const PCLASS: &str = "Pclass";
pub const EMBARKED: &str = "Embarked";
pub const SIBSP: &str = "SibSp";
pub const PARCH: &str = "Parch";

/// Target column in the manifest
pub const TARGET: &str = "Survived";

/// Feature columns in table order
pub const FEATURE_COLUMNS: [&str; 7] = [AGE, FARE, SEX, PCLASS, EMBARKED, SIBSP, PARCH];

/// Convert records into a column-major table with every feature column
pub fn to_table(records: &[PassengerRecord]) -> Result<Table, FeatureError> {
    Table::new()
        .with_column(AGE, Column::Numeric(records.iter().map(|r| r.age).collect()))?
        .with_column(FARE, Column::dense(records.iter().map(|r| r.fare)))?
        .with_column(
            SEX,
            Column::Categorical(records.iter().map(|r| Some(r.sex.as_str().to_string())).collect()),
        )?
        .with_column(PCLASS, Column::dense(records.iter().map(|r| r.pclass.as_f64())))?
        .with_column(
            EMBARKED,
            Column::Categorical(
                records
                    .iter()
                    .map(|r| r.embarked.map(|e| e.code().to_string()))
                    .collect(),
            ),
        )?
        .with_column(SIBSP, Column::dense(records.iter().map(|r| r.sib_sp as f64)))?
        .with_column(PARCH, Column::dense(records.iter().map(|r| r.parch as f64)))
}

/// The unfitted preprocessor used for the survival model
pub fn titanic_preprocessor() -> Result<ColumnPreprocessor, FeatureError> {
    ColumnPreprocessor::new(vec![
        ColumnGroup::new("age", &[AGE], GroupTransform::impute_scale()),
        ColumnGroup::new("num", &[FARE], GroupTransform::scale()),
        ColumnGroup::new("pclass", &[PCLASS], GroupTransform::scale()),
        ColumnGroup::new("cat", &[EMBARKED, SEX], GroupTransform::one_hot_drop_first()),
        ColumnGroup::new("family", &[SIBSP, PARCH], GroupTransform::family()),
    ])
}
