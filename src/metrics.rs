//! Evaluation helpers: time-ordered train/test split and a per-class
//! classification report.

use std::collections::BTreeSet;
use std::fmt;

use ndarray::{Array2, s};

use crate::error::{RegimeError, Result};

/// Train and test partitions of a windowed dataset
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Vec<usize>,
    pub y_test: Vec<usize>,
}

/// Split rows without shuffling: the last ⌈n·test_fraction⌉ rows form the
/// test set, so no test window precedes a training window in time.
///
/// # Errors
/// `InvalidSplit` unless 0 < test_fraction < 1, `LengthMismatch` for
/// misaligned labels, `EmptyInput` if either side would be empty.
pub fn train_test_split(x: &Array2<f64>, y: &[usize], test_fraction: f64) -> Result<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(RegimeError::InvalidSplit(test_fraction));
    }
    let n = x.nrows();
    if y.len() != n {
        return Err(RegimeError::LengthMismatch {
            expected: n,
            actual: y.len(),
        });
    }

    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(RegimeError::EmptyInput(format!(
            "cannot split {} rows with test fraction {}",
            n, test_fraction
        )));
    }
    let n_train = n - n_test;

    Ok(Split {
        x_train: x.slice(s![..n_train, ..]).to_owned(),
        x_test: x.slice(s![n_train.., ..]).to_owned(),
        y_train: y[..n_train].to_vec(),
        y_test: y[n_train..].to_vec(),
    })
}

/// Scores for one class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMetrics {
    pub label: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of true samples of this class
    pub support: usize,
}

/// Per-class precision, recall and F1 plus accuracy and averages
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub total: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl ClassificationReport {
    /// Score predictions against ground truth. Classes are the union of
    /// labels in either sequence; undefined ratios count as 0.
    pub fn new(y_true: &[usize], y_pred: &[usize]) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(RegimeError::LengthMismatch {
                expected: y_true.len(),
                actual: y_pred.len(),
            });
        }
        if y_true.is_empty() {
            return Err(RegimeError::EmptyInput("no predictions to score".into()));
        }

        let labels: BTreeSet<usize> = y_true.iter().chain(y_pred).copied().collect();
        let classes: Vec<ClassMetrics> = labels
            .into_iter()
            .map(|label| {
                let pairs = y_true.iter().zip(y_pred);
                let tp = pairs.clone().filter(|&(&t, &p)| t == label && p == label).count();
                let predicted = y_pred.iter().filter(|&&p| p == label).count();
                let support = y_true.iter().filter(|&&t| t == label).count();

                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
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

        let total = y_true.len();
        let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();

        let k = classes.len() as f64;
        let macro_avg = ClassMetrics {
            label: 0,
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / k,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / k,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / k,
            support: total,
        };
        let weighted = |f: fn(&ClassMetrics) -> f64| {
            classes.iter().map(|c| f(c) * c.support as f64).sum::<f64>() / total as f64
        };
        let weighted_avg = ClassMetrics {
            label: 0,
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1: weighted(|c| c.f1),
            support: total,
        };

        Ok(Self {
            accuracy: ratio(correct, total),
            classes,
            macro_avg,
            weighted_avg,
            total,
        })
    }

    pub fn class(&self, label: usize) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.label == label)
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy", "", "", self.accuracy, self.total
        )?;
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                name, avg.precision, avg.recall, avg.f1, avg.support
            )?;
        }
        Ok(())
    }
}
