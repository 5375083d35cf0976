//! Column-wise Preprocessing
//!
//! A [`ColumnPreprocessor`] owns an ordered list of [`ColumnGroup`]s. Each
//! group applies one transform to a disjoint set of input columns; the
//! outputs are concatenated left to right in registration order to form the
//! [`FeatureMatrix`].

use crate::encoder::OneHotEncoder;
use crate::family::FamilyFeatureDeriver;
use crate::imputer::MedianImputer;
use crate::matrix::FeatureMatrix;
use crate::scaler::StandardScaler;
use crate::table::{Column, Table};
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

/// Copies numeric columns through unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassThrough {
    columns: Option<Vec<String>>,
}

impl PassThrough {
    /// Record the numeric columns to forward
    pub fn fit(&mut self, table: &Table) -> Result<&mut Self, FeatureError> {
        for name in table.column_names() {
            table.numeric(&name)?;
        }
        self.columns = Some(table.column_names());
        Ok(self)
    }

    /// Forward the recorded columns
    pub fn transform(&self, table: &Table) -> Result<Table, FeatureError> {
        let columns = self
            .columns
            .as_ref()
            .ok_or(FeatureError::NotFitted("PassThrough"))?;
        let mut out = Table::new();
        for name in columns {
            out.push(name.clone(), Column::Numeric(table.numeric(name)?.to_vec()))?;
        }
        Ok(out)
    }

    /// Whether fit has been called
    pub fn is_fitted(&self) -> bool {
        self.columns.is_some()
    }
}

/// The closed set of transform kinds a group can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformKind {
    /// Median imputation followed by standard scaling
    ImputeScale,
    /// Standard scaling only
    Scale,
    /// One-hot encoding
    OneHot,
    /// Family feature derivation
    Derive,
    /// Numeric pass-through
    PassThrough,
}

impl TransformKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::ImputeScale => "impute_scale",
            TransformKind::Scale => "scale",
            TransformKind::OneHot => "one_hot",
            TransformKind::Derive => "derive",
            TransformKind::PassThrough => "passthrough",
        }
    }
}

/// Transform applied by one group, carrying its fitted state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupTransform {
    ImputeScale {
        imputer: MedianImputer,
        scaler: StandardScaler,
    },
    Scale(StandardScaler),
    OneHot(OneHotEncoder),
    Derive(FamilyFeatureDeriver),
    PassThrough(PassThrough),
}

impl GroupTransform {
    /// Median imputation then standard scaling
    pub fn impute_scale() -> Self {
        GroupTransform::ImputeScale {
            imputer: MedianImputer::new(),
            scaler: StandardScaler::new(),
        }
    }

    /// Standard scaling
    pub fn scale() -> Self {
        GroupTransform::Scale(StandardScaler::new())
    }

    /// One-hot encoding with the first category of each feature dropped
    pub fn one_hot_drop_first() -> Self {
        GroupTransform::OneHot(OneHotEncoder::new(true))
    }

    /// Family features from `SibSp` and `Parch`
    pub fn family() -> Self {
        GroupTransform::Derive(FamilyFeatureDeriver::default())
    }

    /// Numeric pass-through
    pub fn passthrough() -> Self {
        GroupTransform::PassThrough(PassThrough::default())
    }

    /// Kind of this transform
    pub fn kind(&self) -> TransformKind {
        match self {
            GroupTransform::ImputeScale { .. } => TransformKind::ImputeScale,
            GroupTransform::Scale(_) => TransformKind::Scale,
            GroupTransform::OneHot(_) => TransformKind::OneHot,
            GroupTransform::Derive(_) => TransformKind::Derive,
            GroupTransform::PassThrough(_) => TransformKind::PassThrough,
        }
    }

    fn fit_transform(&mut self, table: &Table) -> Result<Table, FeatureError> {
        match self {
            GroupTransform::ImputeScale { imputer, scaler } => {
                let imputed = imputer.fit(table)?.transform(table)?;
                scaler.fit(&imputed)?.transform(&imputed)
            }
            GroupTransform::Scale(scaler) => scaler.fit(table)?.transform(table),
            GroupTransform::OneHot(encoder) => encoder.fit(table)?.transform(table),
            GroupTransform::Derive(deriver) => deriver.fit(table)?.transform(table),
            GroupTransform::PassThrough(step) => step.fit(table)?.transform(table),
        }
    }

    fn transform(&self, table: &Table) -> Result<Table, FeatureError> {
        match self {
            GroupTransform::ImputeScale { imputer, scaler } => {
                scaler.transform(&imputer.transform(table)?)
            }
            GroupTransform::Scale(scaler) => scaler.transform(table),
            GroupTransform::OneHot(encoder) => encoder.transform(table),
            GroupTransform::Derive(deriver) => deriver.transform(table),
            GroupTransform::PassThrough(step) => step.transform(table),
        }
    }

    /// Fitted state of each sub-step
    pub fn steps(&self) -> Vec<StepStatus> {
        match self {
            GroupTransform::ImputeScale { imputer, scaler } => vec![
                StepStatus::new("imputer", imputer.is_fitted()),
                StepStatus::new("scaler", scaler.is_fitted()),
            ],
            GroupTransform::Scale(scaler) => vec![StepStatus::new("scaler", scaler.is_fitted())],
            GroupTransform::OneHot(encoder) => vec![StepStatus::new("encoder", encoder.is_fitted())],
            GroupTransform::Derive(deriver) => {
                vec![StepStatus::new("family_features", deriver.is_fitted())]
            }
            GroupTransform::PassThrough(step) => {
                vec![StepStatus::new("passthrough", step.is_fitted())]
            }
        }
    }
}

/// Fitted state of a single step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepStatus {
    pub name: String,
    pub fitted: bool,
}

impl StepStatus {
    fn new(name: &str, fitted: bool) -> Self {
        Self {
            name: name.to_string(),
            fitted,
        }
    }
}

/// Fitted state of a whole group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStatus {
    pub name: String,
    pub kind: TransformKind,
    pub columns: Vec<String>,
    pub fitted: bool,
    pub steps: Vec<StepStatus>,
}

/// A named transform bound to a set of input columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnGroup {
    name: String,
    columns: Vec<String>,
    transform: GroupTransform,
}

impl ColumnGroup {
    /// Bind `transform` to `columns` under `name`
    pub fn new<S: AsRef<str>>(name: impl Into<String>, columns: &[S], transform: GroupTransform) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            transform,
        }
    }

    /// Group name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input columns
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Transform applied by this group
    pub fn transform(&self) -> &GroupTransform {
        &self.transform
    }
}

/// What to do with input columns no group declares.
///
/// The default drops them: callers may hand the preprocessor a wider record
/// (ids, names, tickets) and only the declared columns reach the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownColumns {
    /// Silently ignore undeclared columns
    #[default]
    Drop,
    /// Fail with [`FeatureError::UnexpectedColumn`]
    Reject,
}

fn validate_layout(groups: &[ColumnGroup]) -> Result<(), FeatureError> {
    let mut names = HashSet::new();
    let mut claimed = HashSet::new();
    for group in groups {
        if !names.insert(group.name.as_str()) {
            return Err(FeatureError::Layout(format!(
                "group '{}' is declared twice",
                group.name
            )));
        }
        if group.columns.is_empty() {
            return Err(FeatureError::Layout(format!(
                "group '{}' has no columns",
                group.name
            )));
        }
        for column in &group.columns {
            if !claimed.insert(column.as_str()) {
                return Err(FeatureError::Layout(format!(
                    "column '{}' is claimed by more than one group",
                    column
                )));
            }
        }
    }
    Ok(())
}

/// Applies per-group transforms and concatenates their outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnPreprocessor {
    groups: Vec<ColumnGroup>,
    unknown_columns: UnknownColumns,
    feature_names_out: Option<Vec<String>>,
}

impl ColumnPreprocessor {
    /// Create a preprocessor from groups in output order.
    ///
    /// Group names must be unique and no column may belong to two groups.
    pub fn new(groups: Vec<ColumnGroup>) -> Result<Self, FeatureError> {
        validate_layout(&groups)?;
        Ok(Self {
            groups,
            unknown_columns: UnknownColumns::default(),
            feature_names_out: None,
        })
    }

    /// Set the policy for undeclared input columns
    pub fn with_unknown_columns(mut self, policy: UnknownColumns) -> Self {
        self.unknown_columns = policy;
        self
    }

    /// Registered groups in output order
    pub fn groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    /// Every input column some group requires
    pub fn required_columns(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(|g| g.columns.iter().map(String::as_str))
            .collect()
    }

    fn check_unknown(&self, table: &Table) -> Result<(), FeatureError> {
        let required: HashSet<&str> = self.required_columns().into_iter().collect();
        for name in table.column_names() {
            if !required.contains(name.as_str()) {
                match self.unknown_columns {
                    UnknownColumns::Drop => debug!(column = %name, "Dropping undeclared column"),
                    UnknownColumns::Reject => return Err(FeatureError::UnexpectedColumn(name)),
                }
            }
        }
        Ok(())
    }

    /// Learn every group's statistics from `table`
    pub fn fit(&mut self, table: &Table) -> Result<&mut Self, FeatureError> {
        self.fit_transform(table)?;
        Ok(self)
    }

    /// Learn every group's statistics and return the transformed training matrix.
    ///
    /// Groups are fitted on a copy; on error the previous fitted state is kept.
    pub fn fit_transform(&mut self, table: &Table) -> Result<FeatureMatrix, FeatureError> {
        self.check_unknown(table)?;

        let mut groups = self.groups.clone();
        let mut out = Table::new();
        for group in &mut groups {
            let input = table.select(&group.columns)?;
            let output = group.transform.fit_transform(&input)?;
            debug!(
                group = %group.name,
                kind = group.transform.kind().as_str(),
                outputs = output.n_columns(),
                "Fitted column group"
            );
            out = out.hconcat(output)?;
        }

        let matrix = FeatureMatrix::from_table(&out)?;
        info!(
            rows = matrix.n_rows(),
            features = matrix.n_features(),
            "Preprocessor fitted"
        );
        self.groups = groups;
        self.feature_names_out = Some(matrix.feature_names().to_vec());
        Ok(matrix)
    }

    /// Transform `table` with the frozen statistics
    pub fn transform(&self, table: &Table) -> Result<FeatureMatrix, FeatureError> {
        if self.feature_names_out.is_none() {
            return Err(FeatureError::NotFitted("ColumnPreprocessor"));
        }
        self.check_unknown(table)?;

        let mut out = Table::new();
        for group in &self.groups {
            let input = table.select(&group.columns)?;
            out = out.hconcat(group.transform.transform(&input)?)?;
        }
        FeatureMatrix::from_table(&out)
    }

    /// Output feature names, available once fitted
    pub fn feature_names_out(&self) -> Option<&[String]> {
        self.feature_names_out.as_deref()
    }

    /// Whether fit has been called
    pub fn is_fitted(&self) -> bool {
        self.feature_names_out.is_some()
    }

    /// Fitted state of every group and sub-step
    pub fn status(&self) -> Vec<GroupStatus> {
        self.groups
            .iter()
            .map(|g| {
                let steps = g.transform.steps();
                GroupStatus {
                    name: g.name.clone(),
                    kind: g.transform.kind(),
                    columns: g.columns.clone(),
                    fitted: steps.iter().all(|s| s.fitted),
                    steps,
                }
            })
            .collect()
    }
}

impl fmt::Display for ColumnPreprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnPreprocessor(groups=[")?;
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(
                f,
                "('{}', {}, {:?})",
                group.name,
                group.transform.kind().as_str(),
                group.columns
            )?;
        }
        let remainder = match self.unknown_columns {
            UnknownColumns::Drop => "drop",
            UnknownColumns::Reject => "reject",
        };
        write!(f, "], remainder='{}')", remainder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::{FAMILY_SIZE, IS_ALONE};

    fn cat(values: &[&str]) -> Column {
        Column::Categorical(values.iter().map(|v| Some(v.to_string())).collect())
    }

    fn layout() -> ColumnPreprocessor {
        ColumnPreprocessor::new(vec![
            ColumnGroup::new("age", &["Age"], GroupTransform::impute_scale()),
            ColumnGroup::new("num", &["Fare"], GroupTransform::scale()),
            ColumnGroup::new("cat", &["Embarked"], GroupTransform::one_hot_drop_first()),
            ColumnGroup::new("family", &["SibSp", "Parch"], GroupTransform::family()),
        ])
        .unwrap()
    }

    fn training() -> Table {
        Table::new()
            .with_column("Name", cat(&["a", "b", "c", "d"]))
            .unwrap()
            .with_column("Age", Column::Numeric(vec![Some(10.0), Some(20.0), None, Some(60.0)]))
            .unwrap()
            .with_column("Fare", Column::dense([10.0, 20.0, 30.0, 40.0]))
            .unwrap()
            .with_column("Embarked", cat(&["C", "S", "S", "C"]))
            .unwrap()
            .with_column("SibSp", Column::dense([0.0, 1.0, 0.0, 2.0]))
            .unwrap()
            .with_column("Parch", Column::dense([0.0, 0.0, 1.0, 1.0]))
            .unwrap()
    }

    #[test]
    fn test_output_order_follows_registration() {
        let mut pre = layout();
        let matrix = pre.fit_transform(&training()).unwrap();
        assert_eq!(
            matrix.feature_names(),
            &["Age", "Fare", "Embarked_S", FAMILY_SIZE, IS_ALONE].map(String::from)
        );
        assert_eq!(matrix.n_rows(), 4);
    }

    #[test]
    fn test_frozen_median_used_for_held_out_rows() {
        let mut pre = layout();
        pre.fit(&training()).unwrap();

        // Held-out ages have a very different median
        let held_out = Table::new()
            .with_column("Age", Column::Numeric(vec![None, Some(70.0), Some(80.0)]))
            .unwrap()
            .with_column("Fare", Column::dense([10.0, 10.0, 10.0]))
            .unwrap()
            .with_column("Embarked", cat(&["S", "S", "S"]))
            .unwrap()
            .with_column("SibSp", Column::dense([0.0, 0.0, 0.0]))
            .unwrap()
            .with_column("Parch", Column::dense([0.0, 0.0, 0.0]))
            .unwrap();

        let matrix = pre.transform(&held_out).unwrap();
        let (imputer, scaler) = match pre.groups()[0].transform() {
            GroupTransform::ImputeScale { imputer, scaler } => (imputer, scaler),
            other => panic!("unexpected transform {other:?}"),
        };
        let median = imputer.statistics().unwrap()[0].1;
        assert_eq!(median, 20.0);
        let p = &scaler.params().unwrap()[0].1;
        let expected = (median - p.center) / p.scale;
        assert!((matrix.values()[[0, 0]] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unseen_category_encodes_as_zero() {
        let mut pre = layout();
        pre.fit(&training()).unwrap();
        let table = training()
            .select(&["Age", "Fare", "SibSp", "Parch"])
            .unwrap()
            .with_column("Embarked", cat(&["Q", "Q", "Q", "Q"]))
            .unwrap();
        let matrix = pre.transform(&table).unwrap();
        let col = matrix.feature_names().iter().position(|n| n == "Embarked_S").unwrap();
        assert!(matrix.values().column(col).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_missing_declared_column() {
        let mut pre = layout();
        let table = training().select(&["Age", "Fare", "Embarked", "SibSp"]).unwrap();
        assert!(matches!(
            pre.fit(&table),
            Err(FeatureError::MissingColumn { ref column, .. }) if column == "Parch"
        ));
    }

    #[test]
    fn test_failed_refit_keeps_previous_state() {
        let mut pre = layout();
        pre.fit(&training()).unwrap();
        let before = pre.clone();

        // Age and Fare groups would refit before Parch is found missing
        let shifted = Table::new()
            .with_column("Age", Column::dense([90.0, 95.0, 99.0, 100.0]))
            .unwrap()
            .with_column("Fare", Column::dense([500.0, 600.0, 700.0, 800.0]))
            .unwrap()
            .with_column("Embarked", cat(&["Q", "Q", "Q", "Q"]))
            .unwrap()
            .with_column("SibSp", Column::dense([0.0, 0.0, 0.0, 0.0]))
            .unwrap();
        assert!(pre.fit(&shifted).is_err());
        assert_eq!(pre, before);
        assert_eq!(
            pre.transform(&training()).unwrap(),
            before.transform(&training()).unwrap()
        );
    }

    #[test]
    fn test_transform_before_fit() {
        let pre = layout();
        assert!(pre.transform(&training()).unwrap_err().is_not_fitted());
    }

    #[test]
    fn test_reject_policy() {
        let mut pre = layout().with_unknown_columns(UnknownColumns::Reject);
        assert_eq!(
            pre.fit(&training()).unwrap_err(),
            FeatureError::UnexpectedColumn("Name".to_string())
        );
    }

    #[test]
    fn test_overlapping_groups_rejected() {
        let err = ColumnPreprocessor::new(vec![
            ColumnGroup::new("a", &["Fare"], GroupTransform::scale()),
            ColumnGroup::new("b", &["Fare"], GroupTransform::passthrough()),
        ])
        .unwrap_err();
        assert!(matches!(err, FeatureError::Layout(_)));
    }

    #[test]
    fn test_status_reports_sub_steps() {
        let mut pre = layout();
        assert!(pre.status().iter().all(|g| !g.fitted));
        pre.fit(&training()).unwrap();
        let status = pre.status();
        assert!(status.iter().all(|g| g.fitted));
        assert_eq!(status[0].steps.len(), 2);
        assert_eq!(status[3].kind, TransformKind::Derive);
    }

    #[test]
    fn test_passthrough_group() {
        let mut pre = ColumnPreprocessor::new(vec![ColumnGroup::new(
            "raw",
            &["Fare"],
            GroupTransform::passthrough(),
        )])
        .unwrap();
        let matrix = pre.fit_transform(&training()).unwrap();
        assert_eq!(matrix.values()[[3, 0]], 40.0);
    }
}
