//! Passenger Records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label type used by the classifier: `1` survived, `0` did not
pub type Label = usize;

/// Passenger sex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            other => Err(format!("expected \"male\" or \"female\", got \"{other}\"")),
        }
    }
}

/// Ticket class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Pclass {
    First = 1,
    Second = 2,
    Third = 3,
}

impl Pclass {
    /// Numeric class value as fed to the scaler
    pub fn as_f64(&self) -> f64 {
        u8::from(*self) as f64
    }
}

impl TryFrom<u8> for Pclass {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Pclass::First),
            2 => Ok(Pclass::Second),
            3 => Ok(Pclass::Third),
            other => Err(format!("expected 1, 2 or 3, got {other}")),
        }
    }
}

impl From<Pclass> for u8 {
    fn from(value: Pclass) -> Self {
        value as u8
    }
}

/// Port of embarkation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Embarked {
    #[serde(rename = "C")]
    Cherbourg,
    #[serde(rename = "Q")]
    Queenstown,
    #[serde(rename = "S")]
    Southampton,
}

impl Embarked {
    /// One-letter port code
    pub fn code(&self) -> &'static str {
        match self {
            Embarked::Cherbourg => "C",
            Embarked::Queenstown => "Q",
            Embarked::Southampton => "S",
        }
    }
}

impl FromStr for Embarked {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" => Ok(Embarked::Cherbourg),
            "Q" => Ok(Embarked::Queenstown),
            "S" => Ok(Embarked::Southampton),
            other => Err(format!("expected \"Q\", \"C\" or \"S\", got \"{other}\"")),
        }
    }
}

impl fmt::Display for Embarked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One passenger row as used for training and prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerRecord {
    /// Age in years; missing for about a fifth of the manifest
    #[serde(rename = "Age")]
    pub age: Option<f64>,
    /// Ticket fare
    #[serde(rename = "Fare")]
    pub fare: f64,
    #[serde(rename = "Sex")]
    pub sex: Sex,
    #[serde(rename = "Pclass")]
    pub pclass: Pclass,
    /// Port of embarkation; missing for a handful of rows
    #[serde(rename = "Embarked")]
    pub embarked: Option<Embarked>,
    /// Siblings and spouses aboard
    #[serde(rename = "SibSp")]
    pub sib_sp: u32,
    /// Parents and children aboard
    #[serde(rename = "Parch")]
    pub parch: u32,
}

/// Records with their survival labels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledDataset {
    records: Vec<PassengerRecord>,
    labels: Vec<Label>,
}

impl LabeledDataset {
    /// Pair records with labels of the same length
    pub fn new(records: Vec<PassengerRecord>, labels: Vec<Label>) -> Result<Self, crate::DatasetError> {
        if records.len() != labels.len() {
            return Err(crate::DatasetError::LengthMismatch {
                records: records.len(),
                labels: labels.len(),
            });
        }
        Ok(Self { records, labels })
    }

    /// Passenger records
    pub fn records(&self) -> &[PassengerRecord] {
        &self.records
    }

    /// Survival labels
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Copy the rows at `indices`, in order
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}
