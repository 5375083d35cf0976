//! Passenger Data
//!
//! Typed passenger records, manifest loading and validation, the
//! deterministic train/test split, and the Titanic column layout.

mod error;
mod loader;
mod record;
mod sample;
mod schema;
mod split;
mod validator;

pub use error::DatasetError;
pub use loader::{load_dataset, read_csv, DatasetSource};
pub use record::{Embarked, Label, LabeledDataset, PassengerRecord, Pclass, Sex};
pub use sample::{synthetic_manifest, write_csv};
pub use schema::{titanic_preprocessor, to_table, FEATURE_COLUMNS, TARGET};
pub use split::train_test_split;
pub use validator::{RawPassenger, ValidationConfig, Validator};
