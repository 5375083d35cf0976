//! Column Statistics Computation

/// Summary statistics learned from the observed values of one column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnStatistics {
    /// Number of observed (non-missing) values
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Median value
    pub median: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl ColumnStatistics {
    /// Compute statistics over the observed values, skipping missing cells.
    ///
    /// Returns `None` when the column has no observed values.
    pub fn compute(values: &[Option<f64>]) -> Option<Self> {
        let mut observed: Vec<f64> = values.iter().flatten().copied().collect();
        if observed.is_empty() {
            return None;
        }

        let n = observed.len() as f64;

        // Mean
        let mean = observed.iter().sum::<f64>() / n;

        // Variance (ddof = 0)
        let variance = observed
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / n;

        observed.sort_by(|a, b| a.total_cmp(b));
        let mid = observed.len() / 2;
        let median = if observed.len() % 2 == 0 {
            (observed[mid - 1] + observed[mid]) / 2.0
        } else {
            observed[mid]
        };

        Some(Self {
            count: observed.len(),
            mean,
            std_dev: variance.sqrt(),
            median,
            min: observed[0],
            max: observed[observed.len() - 1],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_computation() {
        let values = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)];
        let stats = ColumnStatistics::compute(&values).unwrap();
        assert!((stats.mean - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_std_dev_computation() {
        let values: Vec<_> = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter().map(Some).collect();
        let stats = ColumnStatistics::compute(&values).unwrap();
        assert!((stats.std_dev - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_median_skips_missing() {
        let values = vec![Some(40.0), None, Some(10.0), Some(22.0), None, Some(30.0)];
        let stats = ColumnStatistics::compute(&values).unwrap();
        assert_eq!(stats.count, 4);
        assert!((stats.median - 26.0).abs() < 1e-9);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 40.0);
    }

    #[test]
    fn test_empty_values() {
        assert!(ColumnStatistics::compute(&[]).is_none());
        assert!(ColumnStatistics::compute(&[None, None]).is_none());
    }
}
