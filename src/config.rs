use serde::{de::Error, Deserialize, Serialize};
use std::{io::Read, path::PathBuf};

/// Settings of the evaluation driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Parquet file holding one `(label, prediction)` pair per row.
    pub dataset: PathBuf,
    /// Index of the INT64 column holding the true labels.
    #[serde(default)]
    pub label_column: usize,
    /// Index of the INT64 column holding the predicted labels.
    #[serde(default = "default_prediction_column")]
    pub prediction_column: usize,
    /// Where to write the JSON report, if anywhere.
    #[serde(default)]
    pub report: Option<PathBuf>,
}

fn default_prediction_column() -> usize {
    1
}

impl EvalConfig {
    pub fn new(dataset: impl Into<PathBuf>) -> Self {
        Self {
            dataset: dataset.into(),
            label_column: 0,
            prediction_column: default_prediction_column(),
            report: None,
        }
    }

    /// Loads a configuration from a JSON file.
    pub fn load_from_file(file: &mut dyn Read) -> Result<Self, serde_json::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)
            .map_err(serde_json::Error::custom)?;
        serde_json::from_str(&buffer)
    }
}
