use parquet::errors::ParquetError;
use thiserror::Error;

/// Errors returned by the metric routines and their file helpers.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// A count or value outside the domain of the metric.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Label and prediction sequences of different lengths.
    #[error("shape mismatch: {labels} labels vs {preds} predictions")]
    ShapeMismatch { labels: usize, preds: usize },

    /// A predicted label that does not fit in the class space derived from the true labels.
    #[error("label {label} is outside the class space of size {n_class}")]
    LabelOutOfRange { label: usize, n_class: usize },

    /// No distance function registered under that name.
    #[error("unknown distance: `{0}`")]
    UnknownDistance(String),

    #[error("malformed matrix at line {line}: {reason}")]
    MalformedMatrix { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parquet(#[from] ParquetError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MetricsError>;

/// Fails with [`MetricsError::ShapeMismatch`] unless both sequences have the same length.
pub(crate) fn check_lengths<L, P>(labels: &[L], preds: &[P]) -> Result<usize> {
    if labels.len() != preds.len() {
        return Err(MetricsError::ShapeMismatch {
            labels: labels.len(),
            preds: preds.len(),
        });
    }
    Ok(labels.len())
}
