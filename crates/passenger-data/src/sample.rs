//! Synthetic Manifest
//!
//! Generates a reproducible manifest with the survival pattern of the real
//! one: women in first and second class survive, most other passengers do
//! not. Used by tests, benches and the `sample` CLI command.

use crate::error::DatasetError;
use crate::record::{Embarked, LabeledDataset, PassengerRecord, Pclass, Sex};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

/// Generate `n` labeled passengers from `seed`
pub fn synthetic_manifest(n: usize, seed: u64) -> LabeledDataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);

    for _ in 0..n {
        let pclass = match rng.gen_range(0..10) {
            0..=2 => Pclass::First,
            3..=4 => Pclass::Second,
            _ => Pclass::Third,
        };
        let sex = if rng.gen_bool(0.35) { Sex::Female } else { Sex::Male };
        let fare = match pclass {
            Pclass::First => rng.gen_range(30.0..250.0),
            Pclass::Second => rng.gen_range(10.0..40.0),
            Pclass::Third => rng.gen_range(5.0..20.0),
        };
        let age = if rng.gen_bool(0.2) {
            None
        } else {
            Some(rng.gen_range(1.0..70.0_f64).round())
        };
        let embarked = match rng.gen_range(0..20) {
            0 => None,
            1..=4 => Some(Embarked::Cherbourg),
            5..=6 => Some(Embarked::Queenstown),
            _ => Some(Embarked::Southampton),
        };

        let survived = match (sex, pclass) {
            (Sex::Female, Pclass::First | Pclass::Second) => true,
            (Sex::Female, Pclass::Third) => rng.gen_bool(0.5),
            (Sex::Male, Pclass::First) => rng.gen_bool(0.3),
            (Sex::Male, _) => age.map_or(false, |a| a < 10.0) || rng.gen_bool(0.1),
        };

        records.push(PassengerRecord {
            age,
            fare: (fare * 100.0_f64).round() / 100.0,
            sex,
            pclass,
            embarked,
            sib_sp: rng.gen_range(0..3),
            parch: rng.gen_range(0..3),
        });
        labels.push(usize::from(survived));
    }

    // lengths match by construction
    LabeledDataset::new(records, labels).unwrap_or_default()
}

/// Write a dataset as CSV with the manifest header
pub fn write_csv(path: &Path, dataset: &LabeledDataset) -> Result<(), DatasetError> {
    let io_error = |source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Survived", "Pclass", "Sex", "Age", "SibSp", "Parch", "Fare", "Embarked"])?;
    for (record, label) in dataset.records().iter().zip(dataset.labels()) {
        writer.write_record([
            label.to_string(),
            u8::from(record.pclass).to_string(),
            record.sex.as_str().to_string(),
            record.age.map(|a| a.to_string()).unwrap_or_default(),
            record.sib_sp.to_string(),
            record.parch.to_string(),
            record.fare.to_string(),
            record.embarked.map(|e| e.code().to_string()).unwrap_or_default(),
        ])?;
    }
    writer.flush().map_err(io_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_dataset, DatasetSource};

    #[test]
    fn test_reproducible() {
        assert_eq!(synthetic_manifest(30, 9), synthetic_manifest(30, 9));
        assert_ne!(synthetic_manifest(30, 9), synthetic_manifest(30, 10));
    }

    #[test]
    fn test_upper_class_women_survive() {
        let dataset = synthetic_manifest(200, 4);
        for (record, label) in dataset.records().iter().zip(dataset.labels()) {
            if record.sex == Sex::Female && record.pclass != Pclass::Third {
                assert_eq!(*label, 1);
            }
        }
    }

    #[test]
    fn test_csv_round_trip_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("train.csv");
        let dataset = synthetic_manifest(25, 2);

        write_csv(&path, &dataset).unwrap();
        let loaded = load_dataset(&DatasetSource::Local(path)).unwrap();
        assert_eq!(loaded, dataset);
    }
}
