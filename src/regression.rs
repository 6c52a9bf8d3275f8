use ndarray::{Array, ArrayBase, Axis, Data, RemoveAxis};

use crate::error::{check_lengths, MetricsError, Result};

fn sample_count(labels: &[f64], preds: &[f64]) -> Result<f64> {
    let n = check_lengths(labels, preds)?;
    if n == 0 {
        return Err(MetricsError::InvalidArgument(
            "`n` should be a positive real number".into(),
        ));
    }
    Ok(n as f64)
}

/// Mean Absolute Error (MAE) between true and predicted values.
pub fn mean_absolute_error(labels: &[f64], preds: &[f64]) -> Result<f64> {
    let n = sample_count(labels, preds)?;
    let total: f64 = labels
        .iter()
        .zip(preds)
        .map(|(label, pred)| (label - pred).abs())
        .sum();
    Ok(total / n)
}

/// Mean Squared Error (MSE) between true and predicted values, or its root (RMSE) when
/// `square_root` is set.
pub fn mean_squared_error(labels: &[f64], preds: &[f64], square_root: bool) -> Result<f64> {
    let n = sample_count(labels, preds)?;
    let total: f64 = labels
        .iter()
        .zip(preds)
        .map(|(label, pred)| (label - pred).powi(2))
        .sum();
    let mse = total / n;

    if square_root {
        return Ok(mse.sqrt());
    }
    Ok(mse)
}

/// Z-score normalization along the first axis: `(x - mean) / std`, with the population
/// standard deviation.
///
/// Each column (or trailing sub-array, for higher dimensions) is scaled independently. A
/// constant column has zero deviation and comes out as NaN.
pub fn normalize<S, D>(array: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: RemoveAxis,
{
    let n = array.len_of(Axis(0)) as f64;
    let mean = array.sum_axis(Axis(0)) / n;

    let mut norm = array.to_owned();
    for mut lane in norm.axis_iter_mut(Axis(0)) {
        lane -= &mean;
    }

    let std = norm
        .mapv(|v| v * v)
        .sum_axis(Axis(0))
        .mapv(|v| (v / n).sqrt());
    for mut lane in norm.axis_iter_mut(Axis(0)) {
        lane /= &std;
    }

    norm
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array1};

    #[test]
    fn test_normalize() {
        let norm_array = normalize(&array![1.0, 1.0, 1.0, 2.0]);
        assert_eq!(norm_array[3], 1.7320508075688774);
        assert_eq!(norm_array[0], norm_array[1]);
    }

    #[test]
    fn test_normalize_columns_independently() {
        let data = array![[1.0, 10.0], [3.0, 10.0], [5.0, 40.0], [7.0, 40.0]];
        let norm = normalize(&data);

        for column in norm.columns() {
            assert_relative_eq!(column.sum(), 0.0, epsilon = 1e-12);
            let var = column.mapv(|v| v * v).sum() / column.len() as f64;
            assert_relative_eq!(var, 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(norm[[0, 1]], -1.0);
        assert_relative_eq!(norm[[3, 1]], 1.0);
    }

    #[test]
    fn test_normalize_constant_column_is_nan() {
        let norm = normalize(&Array1::from_elem(3, 4.0));
        assert!(norm.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_mean_absolute_error() {
        let mae = mean_absolute_error(&[1.0, 2.0, 3.0, 4.0], &[1.0, 3.0, 1.0, 4.0]).unwrap();
        assert_eq!(mae, 0.75);
    }

    #[test]
    fn test_mean_squared_error() {
        let labels = [1.0, 2.0, 3.0, 4.0];
        let preds = [1.0, 3.0, 1.0, 4.0];

        assert_eq!(mean_squared_error(&labels, &preds, false).unwrap(), 1.25);
        assert_relative_eq!(
            mean_squared_error(&labels, &preds, true).unwrap(),
            1.25f64.sqrt()
        );
    }

    #[test]
    fn test_errors_reject_empty_input() {
        assert!(matches!(
            mean_absolute_error(&[], &[]),
            Err(MetricsError::InvalidArgument(_))
        ));
        assert!(matches!(
            mean_squared_error(&[], &[], true),
            Err(MetricsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_errors_reject_length_mismatch() {
        assert!(matches!(
            mean_absolute_error(&[1.0, 2.0], &[1.0]),
            Err(MetricsError::ShapeMismatch { .. })
        ));
    }
}
