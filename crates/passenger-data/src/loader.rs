//! Dataset Loading
//!
//! Reads the passenger manifest from a local CSV file or fetches it over
//! HTTP. Columns other than the ones the model uses (PassengerId, Name,
//! Ticket, Cabin) are ignored.

use crate::error::DatasetError;
use crate::record::LabeledDataset;
use crate::validator::{RawPassenger, Validator};
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where the manifest comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// CSV file on disk
    Local(PathBuf),
    /// CSV served over HTTP(S)
    Remote(String),
}

impl DatasetSource {
    /// Build a source from a configured location
    pub fn from_location(location: &str, remote: bool) -> Self {
        if remote {
            DatasetSource::Remote(location.to_string())
        } else {
            DatasetSource::Local(PathBuf::from(location))
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Local(path) => write!(f, "{}", path.display()),
            DatasetSource::Remote(url) => f.write_str(url),
        }
    }
}

/// Load and validate the full labeled manifest
pub fn load_dataset(source: &DatasetSource) -> Result<LabeledDataset, DatasetError> {
    let dataset = match source {
        DatasetSource::Local(path) => {
            let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
                path: path.display().to_string(),
                source,
            })?;
            read_csv(file, &Validator::default())?
        }
        DatasetSource::Remote(url) => {
            let body = fetch(url)?;
            read_csv(body.as_bytes(), &Validator::default())?
        }
    };
    info!(source = %source, rows = dataset.len(), "Loaded passenger dataset");
    Ok(dataset)
}

fn fetch(url: &str) -> Result<String, DatasetError> {
    let failed = |e: reqwest::Error| DatasetError::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    };
    debug!(url, "Fetching remote dataset");
    reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(failed)
}

/// Parse CSV rows, validating each one. Row numbers in errors are zero-based
/// data rows, not counting the header.
pub fn read_csv<R: Read>(reader: R, validator: &Validator) -> Result<LabeledDataset, DatasetError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut labels = Vec::new();
    for (row, raw) in csv.deserialize::<RawPassenger>().enumerate() {
        let (record, label) = validator.validate_row(row, raw?)?;
        records.push(record);
        labels.push(label);
    }
    LabeledDataset::new(records, labels)
}
