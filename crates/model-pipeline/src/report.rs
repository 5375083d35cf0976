//! Classification Report

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Precision, recall and F1 for one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Metrics averaged over classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class and averaged metrics for a set of predictions.
///
/// A ratio with a zero denominator is reported as `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AveragedMetrics,
    pub weighted_avg: AveragedMetrics,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl ClassificationReport {
    /// Compare true labels with predicted labels; both slices must have the
    /// same length.
    pub fn from_labels(truth: &[usize], predicted: &[usize]) -> Self {
        let labels: BTreeSet<usize> = truth.iter().chain(predicted).copied().collect();
        let pairs = || truth.iter().zip(predicted);

        let classes: Vec<ClassMetrics> = labels
            .into_iter()
            .map(|label| {
                let tp = pairs().filter(|(t, p)| **t == label && **p == label).count();
                let predicted_n = pairs().filter(|(_, p)| **p == label).count();
                let support = pairs().filter(|(t, _)| **t == label).count();
                let precision = ratio(tp, predicted_n);
                let recall = ratio(tp, support);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    label,
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect();

        let total = truth.len();
        let correct = pairs().filter(|(t, p)| t == p).count();
        let n = classes.len().max(1) as f64;
        let weight = |m: &ClassMetrics| if total == 0 { 0.0 } else { m.support as f64 / total as f64 };

        Self {
            accuracy: ratio(correct, total),
            macro_avg: AveragedMetrics {
                precision: classes.iter().map(|m| m.precision).sum::<f64>() / n,
                recall: classes.iter().map(|m| m.recall).sum::<f64>() / n,
                f1: classes.iter().map(|m| m.f1).sum::<f64>() / n,
                support: total,
            },
            weighted_avg: AveragedMetrics {
                precision: classes.iter().map(|m| m.precision * weight(m)).sum(),
                recall: classes.iter().map(|m| m.recall * weight(m)).sum(),
                f1: classes.iter().map(|m| m.f1 * weight(m)).sum(),
                support: total,
            },
            classes,
        }
    }

    /// Metrics for one class label
    pub fn class(&self, label: usize) -> Option<&ClassMetrics> {
        self.classes.iter().find(|m| m.label == label)
    }

    /// Number of evaluated rows
    pub fn support(&self) -> usize {
        self.macro_avg.support
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>14} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        for m in &self.classes {
            writeln!(
                f,
                "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:>14} {:>9} {:>9} {:>9.2} {:>9}", "accuracy", "", "", self.accuracy, self.support())?;
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1, avg.support
            )?;
        }
        Ok(())
    }
}
