//! Dense row-major matrix helpers.

use crate::error::{Error, Result};

/// Dense row-major matrix.
pub type Matrix = Vec<Vec<f64>>;

/// Returns `(rows, cols)` of a rectangular matrix.
///
/// An empty matrix has shape `(0, 0)`. Ragged rows are rejected.
pub fn shape(matrix: &[Vec<f64>]) -> Result<(usize, usize)> {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, Vec::len);
    if let Some((i, row)) = matrix.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(Error::DimensionMismatch(format!(
            "row {i} has {} columns, expected {cols}",
            row.len()
        )));
    }
    Ok((rows, cols))
}

/// `n×n` identity matrix.
pub fn identity(n: usize) -> Matrix {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

/// Transpose of a rectangular matrix.
pub fn transpose(matrix: &[Vec<f64>]) -> Result<Matrix> {
    let (rows, cols) = shape(matrix)?;
    Ok((0..cols)
        .map(|j| (0..rows).map(|i| matrix[i][j]).collect())
        .collect())
}

/// Matrix-vector product `A·x`.
pub fn mat_vec(matrix: &[Vec<f64>], x: &[f64]) -> Result<Vec<f64>> {
    let (_, cols) = shape(matrix)?;
    if cols != x.len() {
        return Err(Error::DimensionMismatch(format!(
            "matrix has {cols} columns but vector has {} entries",
            x.len()
        )));
    }
    Ok(matrix
        .iter()
        .map(|row| row.iter().zip(x).map(|(a, b)| a * b).sum())
        .collect())
}

/// Row-vector-matrix product `x·A`.
///
/// For a transition matrix `P` and a distribution `π`, this is one step
/// of the chain: `πP`.
pub fn vec_mat(x: &[f64], matrix: &[Vec<f64>]) -> Result<Vec<f64>> {
    let (rows, cols) = shape(matrix)?;
    if rows != x.len() {
        return Err(Error::DimensionMismatch(format!(
            "vector has {} entries but matrix has {rows} rows",
            x.len()
        )));
    }
    let mut out = vec![0.0; cols];
    for (weight, row) in x.iter().zip(matrix) {
        for (acc, value) in out.iter_mut().zip(row) {
            *acc += weight * value;
        }
    }
    Ok(out)
}

/// Element-wise mean of equally shaped matrices.
pub fn average(matrices: &[Matrix]) -> Result<Matrix> {
    let first = matrices
        .first()
        .ok_or_else(|| Error::DimensionMismatch("cannot average zero matrices".into()))?;
    let (rows, cols) = shape(first)?;
    let mut sum = vec![vec![0.0; cols]; rows];
    for (k, m) in matrices.iter().enumerate() {
        if shape(m)? != (rows, cols) {
            return Err(Error::DimensionMismatch(format!(
                "matrix {k} does not have shape {rows}x{cols}"
            )));
        }
        for (acc_row, row) in sum.iter_mut().zip(m) {
            for (acc, value) in acc_row.iter_mut().zip(row) {
                *acc += value;
            }
        }
    }
    let count = matrices.len() as f64;
    for value in sum.iter_mut().flatten() {
        *value /= count;
    }
    Ok(sum)
}

/// Largest absolute element-wise difference between two vectors.
///
/// Vectors of different length compare as `f64::INFINITY`.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
