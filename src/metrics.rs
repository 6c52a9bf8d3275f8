use tracing::debug;

use crate::error::{check_lengths, MetricsError, Result};

/// Counts of (true label, predicted label) pairs. Rows are true labels, columns predictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix(Box<[Box<[usize]>]>);

impl ConfusionMatrix {
    /// Number of classes, i.e. the side of the matrix.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.0.len()
    }

    /// Count of samples with true label `label` that were predicted as `pred`.
    #[inline]
    pub fn get(&self, label: usize, pred: usize) -> usize {
        self.0[label][pred]
    }

    pub fn rows(&self) -> &[Box<[usize]>] {
        &self.0
    }

    /// Total number of samples accounted for in the matrix.
    pub fn total(&self) -> usize {
        self.0.iter().flatten().sum()
    }

    /// Plain top-1 accuracy (trace over total).
    pub fn accuracy(&self) -> f64 {
        let total_correct: usize = self.0.iter().enumerate().map(|(i, row)| row[i]).sum();
        total_correct as f64 / self.total() as f64
    }

    pub fn recall(&self, class: usize) -> f64 {
        let true_positive = self.0[class][class];
        let total_actual_positive: usize = self.0[class].iter().sum();
        true_positive as f64 / total_actual_positive as f64
    }

    /// Sum over predicted clusters of their majority true-class count, divided by the total.
    pub fn purity(&self) -> f64 {
        let majority: usize = (0..self.n_classes())
            .map(|col| self.0.iter().map(|row| row[col]).max().unwrap_or(0))
            .sum();
        majority as f64 / self.total() as f64
    }
}

/// Size of the class space spanned by `labels`: the largest label plus one.
pub(crate) fn class_count(labels: &[usize]) -> usize {
    labels.iter().max().map_or(0, |&max| max + 1)
}

/// Compute the confusion matrix from a list of true and predicted labels.
///
/// The class space is sized by the true labels, so classes that never occur still get a row
/// and a column.
pub fn confusion_matrix(labels: &[usize], preds: &[usize]) -> Result<ConfusionMatrix> {
    check_lengths(labels, preds)?;
    let n_class = class_count(labels);

    let mut matrix = vec![vec![0usize; n_class].into_boxed_slice(); n_class].into_boxed_slice();

    for (&label, &pred) in labels.iter().zip(preds.iter()) {
        if pred >= n_class {
            return Err(MetricsError::LabelOutOfRange {
                label: pred,
                n_class,
            });
        }
        matrix[label][pred] += 1;
    }

    debug!(n_class, n_samples = labels.len(), "built confusion matrix");
    Ok(ConfusionMatrix(matrix))
}

/// Purity of a clustering against ground truth labels.
///
/// An empty input has no defined purity and yields NaN.
pub fn purity(labels: &[usize], preds: &[usize]) -> Result<f64> {
    Ok(confusion_matrix(labels, preds)?.purity())
}
