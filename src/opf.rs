//! Balanced accuracy as scored by the Optimum-Path Forest classifier.
//!
//! Plain accuracy favours majority classes. The OPF measure instead averages two per-class error
//! rates: errors attributed to the class when it was wrongly predicted, relative to the samples
//! outside the class, and errors attributed to it when its own samples were missed, relative to
//! its size. Classes without samples produce NaN rates, which the reductions here skip.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_lengths, MetricsError, Result};
use crate::metrics::class_count;

/// The two normalized error rates the OPF measure tracks for a single class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassErrorRates {
    /// Samples of other classes predicted as this class, over the number of samples not in it.
    pub false_positive: f64,
    /// Samples of this class predicted as something else, over the class size.
    pub false_negative: f64,
}

impl ClassErrorRates {
    /// Both rates added together, with undefined (NaN) rates contributing nothing.
    pub fn total(&self) -> f64 {
        nan_skipping_sum([self.false_positive, self.false_negative])
    }
}

/// Sums `values`, dropping every NaN term instead of letting it poison the result.
pub fn nan_skipping_sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().filter(|v| !v.is_nan()).sum()
}

/// Dense per-class frequency of the true labels over `[0, n_class)`.
fn bincount(labels: &[usize], n_class: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_class];
    for &label in labels {
        counts[label] += 1;
    }
    counts
}

fn class_errors_with_counts(
    labels: &[usize],
    preds: &[usize],
) -> Result<(Vec<ClassErrorRates>, Vec<usize>)> {
    let n_samples = check_lengths(labels, preds)?;
    let n_class = class_count(labels);
    let counts = bincount(labels, n_class);

    let mut errors = vec![ClassErrorRates::default(); n_class];
    for (&label, &pred) in labels.iter().zip(preds) {
        if label == pred {
            continue;
        }
        if pred >= n_class {
            return Err(MetricsError::LabelOutOfRange {
                label: pred,
                n_class,
            });
        }
        errors[pred].false_positive += 1.0;
        errors[label].false_negative += 1.0;
    }

    for (rates, &count) in errors.iter_mut().zip(&counts) {
        rates.false_negative /= count as f64;
        rates.false_positive /= (n_samples - count) as f64;
    }

    Ok((errors, counts))
}

/// Per-class error rates underlying [`opf_accuracy`], indexed by class.
///
/// A class absent from `labels` has a NaN false-negative rate; a class holding every sample has
/// a NaN false-positive rate.
pub fn opf_class_errors(labels: &[usize], preds: &[usize]) -> Result<Vec<ClassErrorRates>> {
    class_errors_with_counts(labels, preds).map(|(errors, _)| errors)
}

/// OPF balanced accuracy between true and predicted labels.
///
/// The per-class error totals are averaged over the classes that actually occur in `labels`,
/// each contributing two rates. For well-formed input the result lies in `[0, 1]`; predictions
/// of classes absent from `labels` can push it below zero.
pub fn opf_accuracy(labels: &[usize], preds: &[usize]) -> Result<f64> {
    let (errors, counts) = class_errors_with_counts(labels, preds)?;

    let total_error: f64 = errors.iter().map(ClassErrorRates::total).sum();
    let n_observed = counts.iter().filter(|&&count| count > 0).count();

    let accuracy = 1.0 - total_error / (2 * n_observed) as f64;
    debug!(n_class = errors.len(), n_observed, accuracy, "computed OPF accuracy");
    Ok(accuracy)
}

/// OPF accuracy of each class, indexed by label over `[0, max(labels)]`.
///
/// Only misses of a class's own samples count against it. Sizes come from the label values
/// actually observed, so a label that never occurs gets NaN rather than a score.
pub fn opf_accuracy_per_label(labels: &[usize], preds: &[usize]) -> Result<Vec<f64>> {
    check_lengths(labels, preds)?;
    let n_class = class_count(labels);

    let observed = labels.iter().fold(BTreeMap::new(), |mut map, &label| {
        *map.entry(label).or_insert(0usize) += 1;
        map
    });

    let mut errors = vec![0usize; n_class];
    for (&label, &pred) in labels.iter().zip(preds) {
        if label != pred {
            errors[label] += 1;
        }
    }

    Ok(errors
        .into_iter()
        .enumerate()
        .map(|(class, missed)| {
            let count = observed.get(&class).copied().unwrap_or(0);
            1.0 - missed as f64 / count as f64
        })
        .collect())
}
