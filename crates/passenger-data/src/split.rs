//! Train/Test Split

use crate::error::DatasetError;
use crate::record::LabeledDataset;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Shuffle with a seeded RNG and hold out `ceil(test_fraction * n)` rows.
///
/// Both partitions must be non-empty. The same seed always yields the same
/// partition for the same dataset.
pub fn train_test_split(
    dataset: &LabeledDataset,
    test_fraction: f64,
    seed: u64,
) -> Result<(LabeledDataset, LabeledDataset), DatasetError> {
    if dataset.is_empty() {
        return Err(DatasetError::Empty);
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(DatasetError::InvalidSplit(format!(
            "test fraction {test_fraction} must be in (0, 1)"
        )));
    }

    let n = dataset.len();
    let n_test = (test_fraction * n as f64).ceil() as usize;
    if n_test >= n {
        return Err(DatasetError::InvalidSplit(format!(
            "{n} rows leave no training data at test fraction {test_fraction}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    let (test, train) = indices.split_at(n_test);

    debug!(train = train.len(), test = test.len(), seed, "Split dataset");
    Ok((dataset.subset(train), dataset.subset(test)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::synthetic_manifest;

    #[test]
    fn test_sizes() {
        let dataset = synthetic_manifest(891, 1);
        let (train, test) = train_test_split(&dataset, 0.2, 42).unwrap();
        assert_eq!(test.len(), 179);
        assert_eq!(train.len(), 712);
    }

    #[test]
    fn test_deterministic() {
        let dataset = synthetic_manifest(50, 1);
        let a = train_test_split(&dataset, 0.2, 42).unwrap();
        let b = train_test_split(&dataset, 0.2, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_partitions_cover_dataset() {
        let dataset = synthetic_manifest(20, 3);
        let (train, test) = train_test_split(&dataset, 0.25, 7).unwrap();
        assert_eq!(train.len() + test.len(), 20);
        let ones = dataset.labels().iter().sum::<usize>();
        let split_ones = train.labels().iter().sum::<usize>() + test.labels().iter().sum::<usize>();
        assert_eq!(ones, split_ones);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        assert!(matches!(
            train_test_split(&LabeledDataset::default(), 0.2, 42),
            Err(DatasetError::Empty)
        ));
        let single = synthetic_manifest(1, 1);
        assert!(matches!(
            train_test_split(&single, 0.2, 42),
            Err(DatasetError::InvalidSplit(_))
        ));
        let dataset = synthetic_manifest(10, 1);
        assert!(train_test_split(&dataset, 1.5, 42).is_err());
    }
}
