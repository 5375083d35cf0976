//! Column-oriented tabular input

use crate::FeatureError;
use serde::{Deserialize, Serialize};

/// A single typed column; `None` marks a missing cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Numeric values
    Numeric(Vec<Option<f64>>),
    /// Categorical labels
    Categorical(Vec<Option<String>>),
}

impl Column {
    /// Number of rows in the column
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Categorical(values) => values.len(),
        }
    }

    /// True if the column has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a fully observed numeric column
    pub fn dense(values: impl IntoIterator<Item = f64>) -> Self {
        Column::Numeric(values.into_iter().map(Some).collect())
    }
}

/// Rectangular table of named columns.
///
/// Every column has the same number of rows and names are unique; both are
/// checked on insertion, so a `Table` value is always tabular.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<(String, Column)>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, rejecting duplicates and row-count mismatches
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self, FeatureError> {
        self.push(name, column)?;
        Ok(self)
    }

    /// Append a column in place
    pub fn push(&mut self, name: impl Into<String>, column: Column) -> Result<(), FeatureError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(FeatureError::DuplicateColumn(name));
        }
        if let Some((_, first)) = self.columns.first() {
            if first.len() != column.len() {
                return Err(FeatureError::Ragged {
                    column: name,
                    expected: first.len(),
                    actual: column.len(),
                });
            }
        }
        self.columns.push((name, column));
        Ok(())
    }

    /// Number of rows (zero for a table with no columns)
    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }

    /// Number of columns
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|(name, _)| name.clone()).collect()
    }

    /// True if a column with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column, FeatureError> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| FeatureError::MissingColumn {
                column: name.to_string(),
                available: self.column_names(),
            })
    }

    /// Look up a numeric column by name
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>], FeatureError> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(values),
            Column::Categorical(_) => Err(FeatureError::ColumnType {
                column: name.to_string(),
                expected: "numeric",
            }),
        }
    }

    /// Look up a categorical column by name
    pub fn categorical(&self, name: &str) -> Result<&[Option<String>], FeatureError> {
        match self.column(name)? {
            Column::Categorical(values) => Ok(values),
            Column::Numeric(_) => Err(FeatureError::ColumnType {
                column: name.to_string(),
                expected: "categorical",
            }),
        }
    }

    /// Iterate over `(name, column)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Copy the named columns, in the given order, into a new table
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table, FeatureError> {
        let mut selected = Table::new();
        for name in names {
            let name = name.as_ref();
            selected.push(name, self.column(name)?.clone())?;
        }
        Ok(selected)
    }

    /// Append all columns of `other` to the right of this table
    pub fn hconcat(mut self, other: Table) -> Result<Table, FeatureError> {
        for (name, column) in other.columns {
            self.push(name, column)?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_ragged_columns() {
        let err = Table::new()
            .with_column("SibSp", Column::dense([0.0, 1.0]))
            .unwrap()
            .with_column("Parch", Column::dense([0.0]))
            .unwrap_err();
        assert!(matches!(err, FeatureError::Ragged { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Table::new()
            .with_column("Age", Column::dense([1.0]))
            .unwrap()
            .with_column("Age", Column::dense([2.0]))
            .unwrap_err();
        assert_eq!(err, FeatureError::DuplicateColumn("Age".to_string()));
    }

    #[test]
    fn test_select_reports_available_columns() {
        let table = Table::new()
            .with_column("Fare", Column::dense([7.25]))
            .unwrap();
        match table.select(&["Age"]).unwrap_err() {
            FeatureError::MissingColumn { column, available } => {
                assert_eq!(column, "Age");
                assert_eq!(available, vec!["Fare".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_typed_access() {
        let table = Table::new()
            .with_column("Sex", Column::Categorical(vec![Some("male".into())]))
            .unwrap();
        assert!(table.categorical("Sex").is_ok());
        assert!(matches!(
            table.numeric("Sex"),
            Err(FeatureError::ColumnType { expected: "numeric", .. })
        ));
        assert_eq!(table.n_rows(), 1);
    }
}
