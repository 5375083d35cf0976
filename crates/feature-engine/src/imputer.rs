//! Median Imputation

use crate::statistics::ColumnStatistics;
use crate::table::{Column, Table};
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fills missing numeric cells with the median learned at fit time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedianImputer {
    /// Learned `(column, median)` pairs, `None` until fitted
    statistics: Option<Vec<(String, f64)>>,
}

impl MedianImputer {
    /// Create an unfitted imputer
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the median of every column in `table`
    pub fn fit(&mut self, table: &Table) -> Result<&mut Self, FeatureError> {
        let mut statistics = Vec::with_capacity(table.n_columns());
        for name in table.column_names() {
            let values = table.numeric(&name)?;
            let stats = ColumnStatistics::compute(values)
                .ok_or_else(|| FeatureError::NoObservedValues(name.clone()))?;
            debug!(column = %name, median = stats.median, observed = stats.count, "Fitted median imputer");
            statistics.push((name, stats.median));
        }
        self.statistics = Some(statistics);
        Ok(self)
    }

    /// Replace missing cells with the frozen medians
    pub fn transform(&self, table: &Table) -> Result<Table, FeatureError> {
        let statistics = self
            .statistics
            .as_ref()
            .ok_or(FeatureError::NotFitted("MedianImputer"))?;

        let mut out = Table::new();
        for (name, median) in statistics {
            let filled = table
                .numeric(name)?
                .iter()
                .map(|v| Some(v.unwrap_or(*median)))
                .collect();
            out.push(name.clone(), Column::Numeric(filled))?;
        }
        Ok(out)
    }

    /// Learned medians, if fitted
    pub fn statistics(&self) -> Option<&[(String, f64)]> {
        self.statistics.as_deref()
    }

    /// Whether fit has been called
    pub fn is_fitted(&self) -> bool {
        self.statistics.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ages(values: Vec<Option<f64>>) -> Table {
        Table::new().with_column("Age", Column::Numeric(values)).unwrap()
    }

    #[test]
    fn test_fills_with_training_median() {
        let mut imputer = MedianImputer::new();
        imputer
            .fit(&ages(vec![Some(20.0), Some(30.0), None, Some(40.0)]))
            .unwrap();

        let out = imputer.transform(&ages(vec![None, Some(5.0)])).unwrap();
        assert_eq!(out.numeric("Age").unwrap(), &[Some(30.0), Some(5.0)]);
    }

    #[test]
    fn test_transform_before_fit() {
        let imputer = MedianImputer::new();
        let err = imputer.transform(&ages(vec![None])).unwrap_err();
        assert!(err.is_not_fitted());
    }

    #[test]
    fn test_all_missing_column_fails_to_fit() {
        let mut imputer = MedianImputer::new();
        let err = imputer.fit(&ages(vec![None, None])).unwrap_err();
        assert_eq!(err, FeatureError::NoObservedValues("Age".to_string()));
    }
}
