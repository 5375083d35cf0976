//! Passenger Row Validation

use crate::error::DatasetError;
use crate::record::{Embarked, Label, PassengerRecord, Pclass, Sex};
use serde::{Deserialize, Serialize};

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Age valid range (years)
    pub age_range: (f64, f64),
    /// Fare valid range
    pub fare_range: (f64, f64),
    /// SibSp/Parch valid range
    pub count_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            age_range: (0.0, 120.0),
            fare_range: (0.0, 1000.0),
            count_range: (0.0, 20.0),
        }
    }
}

/// A manifest row before validation; every field may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPassenger {
    #[serde(rename = "Survived")]
    pub survived: Option<f64>,
    #[serde(rename = "Pclass")]
    pub pclass: Option<f64>,
    #[serde(rename = "Sex")]
    pub sex: Option<String>,
    #[serde(rename = "Age")]
    pub age: Option<f64>,
    #[serde(rename = "SibSp")]
    pub sib_sp: Option<f64>,
    #[serde(rename = "Parch")]
    pub parch: Option<f64>,
    #[serde(rename = "Fare")]
    pub fare: Option<f64>,
    #[serde(rename = "Embarked")]
    pub embarked: Option<String>,
}

/// Validator for manifest rows and prediction requests
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        row: usize,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<f64, DatasetError> {
        if !value.is_finite() || value < range.0 || value > range.1 {
            Err(DatasetError::OutOfRange {
                row,
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(value)
        }
    }

    fn required<T>(row: usize, field: &'static str, value: Option<T>) -> Result<T, DatasetError> {
        value.ok_or(DatasetError::MissingField { row, field })
    }

    fn count(&self, row: usize, field: &'static str, value: Option<f64>) -> Result<u32, DatasetError> {
        let value = Self::required(row, field, value)?;
        let value = self.validate_range(row, field, value, self.config.count_range)?;
        if value.fract() != 0.0 {
            return Err(DatasetError::InvalidValue {
                row,
                field,
                value: value.to_string(),
            });
        }
        Ok(value as u32)
    }

    /// Validate a manifest row into a record and its label.
    ///
    /// Age and Embarked may be absent; every other field is required.
    pub fn validate_row(&self, row: usize, raw: RawPassenger) -> Result<(PassengerRecord, Label), DatasetError> {
        let survived = Self::required(row, "Survived", raw.survived)?;
        let label = match survived {
            v if v == 0.0 => 0,
            v if v == 1.0 => 1,
            v => {
                return Err(DatasetError::InvalidValue {
                    row,
                    field: "Survived",
                    value: v.to_string(),
                })
            }
        };

        let pclass = Self::required(row, "Pclass", raw.pclass)?;
        let pclass = if pclass.fract() == 0.0 && (1.0..=3.0).contains(&pclass) {
            Pclass::try_from(pclass as u8).map_err(|_| DatasetError::InvalidValue {
                row,
                field: "Pclass",
                value: pclass.to_string(),
            })?
        } else {
            return Err(DatasetError::InvalidValue {
                row,
                field: "Pclass",
                value: pclass.to_string(),
            });
        };

        let sex_raw = Self::required(row, "Sex", raw.sex)?;
        let sex: Sex = sex_raw.parse().map_err(|_| DatasetError::InvalidValue {
            row,
            field: "Sex",
            value: sex_raw.clone(),
        })?;

        let embarked = match raw.embarked.as_deref() {
            None | Some("") => None,
            Some(code) => Some(code.parse::<Embarked>().map_err(|_| DatasetError::InvalidValue {
                row,
                field: "Embarked",
                value: code.to_string(),
            })?),
        };

        let record = PassengerRecord {
            age: raw.age,
            fare: Self::required(row, "Fare", raw.fare)?,
            sex,
            pclass,
            embarked,
            sib_sp: self.count(row, "SibSp", raw.sib_sp)?,
            parch: self.count(row, "Parch", raw.parch)?,
        };
        self.validate_record(row, &record)?;
        Ok((record, label))
    }

    /// Range-check an already typed record
    pub fn validate_record(&self, row: usize, record: &PassengerRecord) -> Result<(), DatasetError> {
        if let Some(age) = record.age {
            self.validate_range(row, "Age", age, self.config.age_range)?;
        }
        self.validate_range(row, "Fare", record.fare, self.config.fare_range)?;
        self.validate_range(row, "SibSp", record.sib_sp as f64, self.config.count_range)?;
        self.validate_range(row, "Parch", record.parch as f64, self.config.count_range)?;
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawPassenger {
        RawPassenger {
            survived: Some(0.0),
            pclass: Some(3.0),
            sex: Some("male".into()),
            age: Some(22.0),
            sib_sp: Some(1.0),
            parch: Some(0.0),
            fare: Some(7.25),
            embarked: Some("S".into()),
        }
    }

    #[test]
    fn test_valid_row() {
        let validator = Validator::default();
        let (record, label) = validator.validate_row(0, raw()).unwrap();
        assert_eq!(label, 0);
        assert_eq!(record.pclass, Pclass::Third);
        assert_eq!(record.sib_sp, 1);
        assert_eq!(record.embarked, Some(Embarked::Southampton));
    }

    #[test]
    fn test_optional_fields() {
        let validator = Validator::default();
        let row = RawPassenger {
            age: None,
            embarked: Some(String::new()),
            ..raw()
        };
        let (record, _) = validator.validate_row(0, row).unwrap();
        assert_eq!(record.age, None);
        assert_eq!(record.embarked, None);
    }

    #[test]
    fn test_missing_fare() {
        let validator = Validator::default();
        let row = RawPassenger { fare: None, ..raw() };
        assert!(matches!(
            validator.validate_row(4, row),
            Err(DatasetError::MissingField { row: 4, field: "Fare" })
        ));
    }

    #[test]
    fn test_invalid_categories() {
        let validator = Validator::default();
        let row = RawPassenger { sex: Some("unknown".into()), ..raw() };
        assert!(matches!(
            validator.validate_row(0, row),
            Err(DatasetError::InvalidValue { field: "Sex", .. })
        ));

        let row = RawPassenger { pclass: Some(2.5), ..raw() };
        assert!(matches!(
            validator.validate_row(0, row),
            Err(DatasetError::InvalidValue { field: "Pclass", .. })
        ));

        let row = RawPassenger { survived: Some(2.0), ..raw() };
        assert!(matches!(
            validator.validate_row(0, row),
            Err(DatasetError::InvalidValue { field: "Survived", .. })
        ));
    }

    #[test]
    fn test_age_range() {
        let validator = Validator::default();
        let row = RawPassenger { age: Some(-1.0), ..raw() };
        assert!(matches!(
            validator.validate_row(0, row),
            Err(DatasetError::OutOfRange { field: "Age", .. })
        ));
        let row = RawPassenger { age: Some(0.42), ..raw() };
        assert!(validator.validate_row(0, row).is_ok());
    }
}
