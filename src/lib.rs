//! Evaluation metrics for classification and clustering outputs, with the balanced accuracy
//! convention of the Optimum-Path Forest classifier and a pairwise distance precomputation
//! utility.

pub mod config;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod metrics;
pub mod opf;
pub mod regression;
pub mod report;

pub use distance::{
    distance_matrix, load_matrix, pre_compute_distance, save_matrix, DistanceFn, DistanceRegistry,
};
pub use error::{MetricsError, Result};
pub use metrics::{confusion_matrix, purity, ConfusionMatrix};
pub use opf::{
    nan_skipping_sum, opf_accuracy, opf_accuracy_per_label, opf_class_errors, ClassErrorRates,
};
pub use regression::{mean_absolute_error, mean_squared_error, normalize};
pub use report::MetricsReport;
