//! Precomputation of pairwise distance matrices.
//!
//! Distance functions are not defined here: the caller registers them by name in a
//! [`DistanceRegistry`] and hands that registry to the routines below.

use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use indexmap::IndexMap;
use ndarray::{Array2, ArrayView1, ArrayView2};
use tracing::info;

use crate::error::{MetricsError, Result};

/// A distance between two feature vectors.
pub type DistanceFn = Box<dyn Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> f64 + Send + Sync>;

/// Named distance functions, kept in registration order.
#[derive(Default)]
pub struct DistanceRegistry {
    distances: IndexMap<Box<str>, DistanceFn>,
}

impl DistanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `distance` under `name`, returning the function it replaced, if any.
    pub fn register<F>(&mut self, name: &str, distance: F) -> Option<DistanceFn>
    where
        F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> f64 + Send + Sync + 'static,
    {
        self.distances.insert(name.into(), Box::new(distance))
    }

    /// Looks up the distance registered under `name`.
    pub fn get(&self, name: &str) -> Result<&DistanceFn> {
        self.distances
            .get(name)
            .ok_or_else(|| MetricsError::UnknownDistance(name.to_string()))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.distances.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.distances.keys().map(|name| name.as_ref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

impl fmt::Debug for DistanceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Distance between every ordered pair of rows of `data`, self-pairs included.
pub fn distance_matrix(
    data: ArrayView2<'_, f64>,
    registry: &DistanceRegistry,
    distance: &str,
) -> Result<Array2<f64>> {
    let distance_fn = registry.get(distance)?;
    let size = data.nrows();

    Ok(Array2::from_shape_fn((size, size), |(i, j)| {
        distance_fn(data.row(i), data.row(j))
    }))
}

/// Computes the pairwise distance matrix of `data` and saves it as text to `output`.
pub fn pre_compute_distance(
    data: ArrayView2<'_, f64>,
    output: &Path,
    distance: &str,
    registry: &DistanceRegistry,
) -> Result<()> {
    info!("Pre-computing distances ...");

    let distances = distance_matrix(data, registry, distance)?;

    let mut file = File::create(output)?;
    save_matrix(distances.view(), &mut file)?;

    info!("Distances saved to: {}.", output.display());
    Ok(())
}

/// Writes `matrix` as whitespace-delimited text, one row per line and no header.
pub fn save_matrix(matrix: ArrayView2<'_, f64>, file: &mut dyn Write) -> Result<()> {
    let mut writer = BufWriter::new(file);
    for row in matrix.rows() {
        let line = row
            .iter()
            .map(|value| format!("{value:.18e}"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a matrix written by [`save_matrix`]. Blank lines are skipped; every row must have the
/// same number of columns.
pub fn load_matrix(file: &mut dyn Read) -> Result<Array2<f64>> {
    let reader = BufReader::new(file);
    let mut values = Vec::new();
    let mut n_cols = None;
    let mut n_rows = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|e| MetricsError::MalformedMatrix {
                    line: idx + 1,
                    reason: format!("`{token}`: {e}"),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        match n_cols {
            None => n_cols = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(MetricsError::MalformedMatrix {
                    line: idx + 1,
                    reason: format!("expected {expected} columns, found {}", row.len()),
                });
            }
            Some(_) => {}
        }

        values.extend(row);
        n_rows += 1;
    }

    Array2::from_shape_vec((n_rows, n_cols.unwrap_or(0)), values).map_err(|e| {
        MetricsError::MalformedMatrix {
            line: n_rows,
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn manhattan(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = DistanceRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register("manhattan", manhattan).is_none());
        assert!(registry.register("zero", |_, _| 0.0).is_none());

        assert!(registry.contains("manhattan"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["manhattan", "zero"]);
        assert!(registry.register("zero", |_, _| 1.0).is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_distance() {
        let registry = DistanceRegistry::new();
        let data = array![[0.0, 1.0]];
        let err = distance_matrix(data.view(), &registry, "log_squared_euclidean").unwrap_err();
        assert!(matches!(err, MetricsError::UnknownDistance(name) if name == "log_squared_euclidean"));
    }

    #[test]
    fn test_distance_matrix_includes_every_pair() {
        let mut registry = DistanceRegistry::new();
        registry.register("manhattan", manhattan);

        let data = array![[0.0, 0.0], [1.0, 2.0], [4.0, 0.0]];
        let distances = distance_matrix(data.view(), &registry, "manhattan").unwrap();

        assert_eq!(distances.dim(), (3, 3));
        assert_eq!(distances[[0, 1]], 3.0);
        assert_eq!(distances[[1, 2]], 5.0);
        assert_eq!(distances[[2, 0]], 4.0);
        assert!(distances.diag().iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_distance_matrix_asymmetric_metric() {
        let mut registry = DistanceRegistry::new();
        registry.register("shift", |a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>| a[0] - b[0]);

        let data = array![[1.0], [3.0]];
        let distances = distance_matrix(data.view(), &registry, "shift").unwrap();
        assert_eq!(distances, array![[0.0, -2.0], [2.0, 0.0]]);
    }

    #[test]
    fn test_save_and_load_matrix() {
        let matrix = array![[0.0, 1.5, -2.25], [1e-300, 3.0, 0.1]];
        let mut buffer = Vec::new();
        save_matrix(matrix.view(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(text.lines().next().unwrap().split(' ').count(), 3);

        let loaded = load_matrix(&mut buffer.as_slice()).unwrap();
        assert_eq!(loaded, matrix);
    }

    #[test]
    fn test_load_matrix_rejects_ragged_rows() {
        let text = "1 2 3\n4 5\n";
        let err = load_matrix(&mut text.as_bytes()).unwrap_err();
        assert!(matches!(err, MetricsError::MalformedMatrix { line: 2, .. }));
    }

    #[test]
    fn test_load_matrix_rejects_garbage() {
        let err = load_matrix(&mut "1 x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MetricsError::MalformedMatrix { line: 1, .. }));
    }
}
