//! Family Feature Derivation
//!
//! Turns the sibling/spouse and parent/child counts of a passenger into
//! `family_size` (`SibSp + Parch + 1`) and `isAlone` (`1` when the
//! passenger travels without family, `0` otherwise).

use crate::table::{Column, Table};
use crate::FeatureError;
use serde::{Deserialize, Serialize};

/// Name of the derived family size column
pub const FAMILY_SIZE: &str = "family_size";
/// Name of the derived travelling-alone indicator column
pub const IS_ALONE: &str = "isAlone";

/// Column metadata recorded at fit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeenColumns {
    /// Number of columns seen during fit
    pub n_features_in: usize,
    /// Names of columns seen during fit
    pub feature_names_in: Vec<String>,
}

/// Row-wise family feature deriver.
///
/// No statistics are learned, but `fit` still validates the input and
/// records the columns it saw so the step reports as fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyFeatureDeriver {
    sibsp_column: String,
    parch_column: String,
    seen: Option<SeenColumns>,
}

impl Default for FamilyFeatureDeriver {
    fn default() -> Self {
        Self::new("SibSp", "Parch")
    }
}

impl FamilyFeatureDeriver {
    /// Create a deriver reading the given count columns
    pub fn new(sibsp_column: impl Into<String>, parch_column: impl Into<String>) -> Self {
        Self {
            sibsp_column: sibsp_column.into(),
            parch_column: parch_column.into(),
            seen: None,
        }
    }

    /// Validate that both count columns exist and record the seen columns
    pub fn fit(&mut self, table: &Table) -> Result<&mut Self, FeatureError> {
        table.column(&self.sibsp_column)?;
        table.column(&self.parch_column)?;

        self.seen = Some(SeenColumns {
            n_features_in: table.n_columns(),
            feature_names_in: table.column_names(),
        });
        Ok(self)
    }

    fn counts(&self, table: &Table, name: &str) -> Result<Vec<f64>, FeatureError> {
        table
            .numeric(name)?
            .iter()
            .enumerate()
            .map(|(row, v)| match v {
                None => Err(FeatureError::MissingValue {
                    column: name.to_string(),
                    row,
                }),
                Some(v) if *v < 0.0 => Err(FeatureError::InvalidValue {
                    column: name.to_string(),
                    row,
                    value: *v,
                    reason: "count must be non-negative",
                }),
                Some(v) => Ok(*v),
            })
            .collect()
    }

    /// Derive `family_size` and `isAlone` for every row
    pub fn transform(&self, table: &Table) -> Result<Table, FeatureError> {
        if self.seen.is_none() {
            return Err(FeatureError::NotFitted("FamilyFeatureDeriver"));
        }

        let sibsp = self.counts(table, &self.sibsp_column)?;
        let parch = self.counts(table, &self.parch_column)?;

        let family_size: Vec<f64> = sibsp
            .iter()
            .zip(&parch)
            .map(|(s, p)| s + p + 1.0)
            .collect();
        let is_alone: Vec<f64> = family_size
            .iter()
            .map(|&size| if size == 1.0 { 1.0 } else { 0.0 })
            .collect();

        Table::new()
            .with_column(FAMILY_SIZE, Column::dense(family_size))?
            .with_column(IS_ALONE, Column::dense(is_alone))
    }

    /// Output column names
    pub fn feature_names_out(&self) -> [&'static str; 2] {
        [FAMILY_SIZE, IS_ALONE]
    }

    /// Columns recorded at fit time
    pub fn seen_columns(&self) -> Option<&SeenColumns> {
        self.seen.as_ref()
    }

    /// Whether fit has been called
    pub fn is_fitted(&self) -> bool {
        self.seen.is_some()
    }
}
