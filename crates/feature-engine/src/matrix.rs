//! Feature Matrix Assembly

use crate::table::Table;
use crate::FeatureError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Dense numeric design matrix with named columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    values: Array2<f64>,
    feature_names: Vec<String>,
}

impl FeatureMatrix {
    /// Assemble a matrix from a fully observed numeric table
    pub fn from_table(table: &Table) -> Result<Self, FeatureError> {
        let rows = table.n_rows();
        let mut columns = Vec::with_capacity(table.n_columns());
        let mut feature_names = Vec::with_capacity(table.n_columns());

        for (name, _) in table.iter() {
            let dense = table
                .numeric(name)?
                .iter()
                .enumerate()
                .map(|(row, v)| {
                    v.ok_or_else(|| FeatureError::MissingValue {
                        column: name.to_string(),
                        row,
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            columns.push(dense);
            feature_names.push(name.to_string());
        }

        let values = Array2::from_shape_fn((rows, columns.len()), |(r, c)| columns[c][r]);
        Ok(Self {
            values,
            feature_names,
        })
    }

    /// Matrix values, one row per input record
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Output feature names in column order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of features
    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }
}
