use std::{fs::File, path::Path};

use parquet::{
    file::{reader::FileReader, serialized_reader::SerializedFileReader},
    record::RowAccessor,
};
use tracing::info;

use crate::error::{MetricsError, Result};

fn to_label(value: i64, row: usize, column: usize) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        MetricsError::InvalidArgument(format!(
            "negative label {value} at row {row}, column {column}"
        ))
    })
}

/// Reads true and predicted labels from two INT64 columns of a parquet file.
pub fn load_label_pairs(
    path: &Path,
    label_column: usize,
    prediction_column: usize,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let dataset_file = File::open(path)?;
    let dataset = SerializedFileReader::new(dataset_file)?;

    let mut labels = Vec::new();
    let mut preds = Vec::new();
    for (idx, row) in dataset.get_row_iter(None)?.enumerate() {
        let row = row?;
        labels.push(to_label(row.get_long(label_column)?, idx, label_column)?);
        preds.push(to_label(
            row.get_long(prediction_column)?,
            idx,
            prediction_column,
        )?);
    }

    info!(n_samples = labels.len(), path = %path.display(), "loaded label pairs");
    Ok((labels, preds))
}
