//! One-Hot Encoding

use crate::table::{Column, Table};
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// One-hot encoder with optional first-category drop.
///
/// Categories are learned in sorted order. At transform time a category not
/// seen during fit, or a missing cell, encodes as all zeros instead of
/// failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    drop_first: bool,
    categories: Option<Vec<(String, Vec<String>)>>,
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl OneHotEncoder {
    /// Create an unfitted encoder
    pub fn new(drop_first: bool) -> Self {
        Self {
            drop_first,
            categories: None,
        }
    }

    /// Learn the category vocabulary of every column. Missing cells are not
    /// a category of their own, so they never get an indicator column.
    pub fn fit(&mut self, table: &Table) -> Result<&mut Self, FeatureError> {
        let mut categories = Vec::with_capacity(table.n_columns());
        for name in table.column_names() {
            let vocabulary: BTreeSet<&str> = table
                .categorical(&name)?
                .iter()
                .flatten()
                .map(String::as_str)
                .collect();
            let vocabulary: Vec<String> = vocabulary.into_iter().map(str::to_string).collect();
            debug!(column = %name, categories = ?vocabulary, "Fitted one-hot encoder");
            categories.push((name, vocabulary));
        }
        self.categories = Some(categories);
        Ok(self)
    }

    fn kept<'a>(&self, vocabulary: &'a [String]) -> &'a [String] {
        if self.drop_first && !vocabulary.is_empty() {
            &vocabulary[1..]
        } else {
            vocabulary
        }
    }

    /// Emit one indicator column per kept category, named `{column}_{category}`
    pub fn transform(&self, table: &Table) -> Result<Table, FeatureError> {
        let categories = self
            .categories
            .as_ref()
            .ok_or(FeatureError::NotFitted("OneHotEncoder"))?;

        let mut out = Table::new();
        for (name, vocabulary) in categories {
            let values = table.categorical(name)?;
            for category in self.kept(vocabulary) {
                let indicator = values.iter().map(|v| {
                    if v.as_deref() == Some(category.as_str()) {
                        1.0
                    } else {
                        0.0
                    }
                });
                out.push(format!("{name}_{category}"), Column::dense(indicator))?;
            }
        }
        Ok(out)
    }

    /// Learned vocabularies, if fitted
    pub fn categories(&self) -> Option<&[(String, Vec<String>)]> {
        self.categories.as_deref()
    }

    /// Whether fit has been called
    pub fn is_fitted(&self) -> bool {
        self.categories.is_some()
    }
}
