use serde::{de::Error, Deserialize, Serialize};
use std::io::Read;
use tracing::debug;

use crate::{
    error::Result,
    metrics::confusion_matrix,
    opf::{opf_accuracy, opf_accuracy_per_label},
    regression::{mean_absolute_error, mean_squared_error},
};

/// Every label metric of the crate computed over one set of predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub n_samples: usize,
    pub n_classes: usize,
    /// Plain top-1 accuracy.
    pub accuracy: f64,
    pub opf_accuracy: f64,
    /// Per-class OPF accuracy; `None` for classes that never occur in the labels.
    pub opf_accuracy_per_label: Vec<Option<f64>>,
    pub purity: f64,
    /// Error metrics over the label values taken as numbers.
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
}

impl MetricsReport {
    /// Scores `preds` against `labels`. Both must be non-empty and of equal length.
    pub fn evaluate(labels: &[usize], preds: &[usize]) -> Result<Self> {
        let c_matrix = confusion_matrix(labels, preds)?;

        let label_values: Vec<f64> = labels.iter().map(|&l| l as f64).collect();
        let pred_values: Vec<f64> = preds.iter().map(|&p| p as f64).collect();

        let report = Self {
            n_samples: labels.len(),
            n_classes: c_matrix.n_classes(),
            accuracy: c_matrix.accuracy(),
            opf_accuracy: opf_accuracy(labels, preds)?,
            opf_accuracy_per_label: opf_accuracy_per_label(labels, preds)?
                .into_iter()
                .map(|acc| (!acc.is_nan()).then_some(acc))
                .collect(),
            purity: c_matrix.purity(),
            mae: mean_absolute_error(&label_values, &pred_values)?,
            mse: mean_squared_error(&label_values, &pred_values, false)?,
            rmse: mean_squared_error(&label_values, &pred_values, true)?,
        };

        debug!(?report, "evaluated predictions");
        Ok(report)
    }

    /// Loads a report from a JSON file.
    pub fn load_from_file(file: &mut dyn Read) -> std::result::Result<Self, serde_json::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)
            .map_err(serde_json::Error::custom)?;
        serde_json::from_str(&buffer)
    }

    /// Saves the report as JSON.
    pub fn save_to_file(
        &self,
        file: &mut dyn std::io::Write,
    ) -> std::result::Result<(), serde_json::Error> {
        let serialized = serde_json::to_string_pretty(self)?;
        file.write_all(serialized.as_bytes())
            .map_err(serde_json::Error::custom)
    }
}
