//! Nearest-neighbour lookup in point sets of any dimension, for snapping
//! measured locations (sensor coordinates, say) onto model stations.
//!
//! Points are the rows of a `[npoints × ndim]` matrix. Lookups are a linear
//! scan over squared Euclidean distance; ties go to the lowest row index.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::error::{ModalError, Result};

/// Row index of the point nearest to `query`.
///
/// # Errors
/// - `EmptyPointSet` if `points` has no rows
/// - `DimensionMismatch` if `query` and the points differ in dimension
pub fn search(points: &DMatrix<f64>, query: &[f64]) -> Result<usize> {
    if points.nrows() == 0 {
        return Err(ModalError::EmptyPointSet);
    }
    if query.len() != points.ncols() {
        return Err(ModalError::DimensionMismatch {
            context: "query point dimension",
            expected: points.ncols(),
            found: query.len(),
        });
    }

    let distance = |i: usize| -> f64 {
        points
            .row(i)
            .iter()
            .zip(query)
            .map(|(p, q)| (p - q) * (p - q))
            .sum()
    };
    (0..points.nrows())
        .min_by(|&a, &b| distance(a).total_cmp(&distance(b)))
        .ok_or(ModalError::EmptyPointSet)
}

/// The point nearest to `query`, copied out of `points`.
pub fn snap(points: &DMatrix<f64>, query: &[f64]) -> Result<DVector<f64>> {
    let index = search(points, query)?;
    Ok(points.row(index).transpose())
}

/// [`search`] for every row of `queries`.
pub fn search_all(points: &DMatrix<f64>, queries: &DMatrix<f64>) -> Result<Vec<usize>> {
    (0..queries.nrows())
        .into_par_iter()
        .map(|i| {
            let query: Vec<f64> = queries.row(i).iter().copied().collect();
            search(points, &query)
        })
        .collect()
}
