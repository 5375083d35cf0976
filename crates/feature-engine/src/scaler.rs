//! Standard Scaling

use crate::statistics::ColumnStatistics;
use crate::table::{Column, Table};
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for one fitted column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    /// Column mean
    pub center: f64,
    /// Population standard deviation, 1.0 for constant columns
    pub scale: f64,
}

/// Z-score scaler: `(x - mean) / std`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    params: Option<Vec<(String, ScalerParams)>>,
}

fn dense(name: &str, values: &[Option<f64>]) -> Result<Vec<f64>, FeatureError> {
    values
        .iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| FeatureError::MissingValue {
                column: name.to_string(),
                row,
            })
        })
        .collect()
}

impl StandardScaler {
    /// Create an unfitted scaler
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn mean and standard deviation for each column.
    ///
    /// Columns must be fully observed; impute first if they are not.
    pub fn fit(&mut self, table: &Table) -> Result<&mut Self, FeatureError> {
        let mut params = Vec::with_capacity(table.n_columns());
        for name in table.column_names() {
            let values = table.numeric(&name)?;
            dense(&name, values)?;
            let stats = ColumnStatistics::compute(values)
                .ok_or_else(|| FeatureError::NoObservedValues(name.clone()))?;
            let scale = if stats.std_dev == 0.0 { 1.0 } else { stats.std_dev };
            debug!(column = %name, mean = stats.mean, scale, "Fitted standard scaler");
            params.push((name, ScalerParams { center: stats.mean, scale }));
        }
        self.params = Some(params);
        Ok(self)
    }

    /// Scale columns with the frozen parameters
    pub fn transform(&self, table: &Table) -> Result<Table, FeatureError> {
        let params = self
            .params
            .as_ref()
            .ok_or(FeatureError::NotFitted("StandardScaler"))?;

        let mut out = Table::new();
        for (name, p) in params {
            let scaled = dense(name, table.numeric(name)?)?
                .into_iter()
                .map(|v| (v - p.center) / p.scale);
            out.push(name.clone(), Column::dense(scaled))?;
        }
        Ok(out)
    }

    /// Learned parameters, if fitted
    pub fn params(&self) -> Option<&[(String, ScalerParams)]> {
        self.params.as_deref()
    }

    /// Whether fit has been called
    pub fn is_fitted(&self) -> bool {
        self.params.is_some()
    }
}
