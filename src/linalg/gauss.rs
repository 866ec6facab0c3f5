//! Gaussian elimination with partial pivoting.
//!
//! # Algorithm
//!
//! For each pivot column `i` the row with the largest `|A[k][i]|`,
//! `k ≥ i`, is swapped into position `i` (with its constant), then
//! column `i` is eliminated from every row below. Back-substitution runs
//! from the last pivot row upward.
//!
//! Systems may be overdetermined (`rows ≥ cols`). The solution comes from
//! the `cols` pivot rows; every original equation is then checked against
//! it, and a miss beyond [`CONSISTENCY_TOLERANCE`] (scaled by the size of
//! the row's terms) fails with [`Error::InconsistentSystem`].
//! Stationary-distribution solves rely on this (`n` balance equations plus
//! the normalization row, `n` unknowns).
//!
//! # References
//!
//! - Golub & Van Loan (2013), *Matrix Computations*, §3.4
//! - Trefethen & Bau (1997), *Numerical Linear Algebra*, Lecture 21

use super::matrix::{mat_vec, shape, Matrix};
use crate::error::{Error, Result};

/// Default absolute pivot tolerance.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-12;

/// Relative residual allowed on the equations of an overdetermined system.
pub const CONSISTENCY_TOLERANCE: f64 = 1e-8;

/// Strategy for solving `A·x = b`.
///
/// Implementations borrow their inputs and must not modify them; any
/// in-place work happens on private copies.
pub trait LinearSolver: Send + Sync {
    /// Solves `coefficients · x = constants`.
    ///
    /// `coefficients` is `rows × cols` with `rows ≥ cols`; `constants`
    /// has `rows` entries; the solution has `cols` entries.
    fn solve(&self, coefficients: &[Vec<f64>], constants: &[f64]) -> Result<Vec<f64>>;
}

/// Gaussian elimination with partial pivoting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussElimination {
    /// Pivots with magnitude at or below this value are treated as zero.
    pub pivot_tolerance: f64,
}

impl Default for GaussElimination {
    fn default() -> Self {
        Self {
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
        }
    }
}

impl GaussElimination {
    /// Creates a solver with a custom pivot tolerance.
    pub fn with_pivot_tolerance(pivot_tolerance: f64) -> Self {
        Self { pivot_tolerance }
    }
}

impl LinearSolver for GaussElimination {
    fn solve(&self, coefficients: &[Vec<f64>], constants: &[f64]) -> Result<Vec<f64>> {
        let (rows, cols) = shape(coefficients)?;
        if cols == 0 {
            return Err(Error::DimensionMismatch("system has no unknowns".into()));
        }
        if constants.len() != rows {
            return Err(Error::DimensionMismatch(format!(
                "{rows} equations but {} constants",
                constants.len()
            )));
        }
        if rows < cols {
            return Err(Error::DimensionMismatch(format!(
                "underdetermined system: {rows} equations for {cols} unknowns"
            )));
        }

        let mut a: Matrix = coefficients.to_vec();
        let mut b: Vec<f64> = constants.to_vec();

        // Forward elimination
        for i in 0..cols {
            let (pivot_row, magnitude) = (i..rows)
                .map(|k| (k, a[k][i].abs()))
                .fold((i, f64::NEG_INFINITY), |best, cur| {
                    if cur.1 > best.1 {
                        cur
                    } else {
                        best
                    }
                });
            // NaN magnitudes fail this comparison too.
            if !(magnitude > self.pivot_tolerance) {
                return Err(Error::SingularSystem {
                    column: i,
                    magnitude,
                });
            }
            a.swap(i, pivot_row);
            b.swap(i, pivot_row);

            let (upper, lower) = a.split_at_mut(i + 1);
            let pivot = &upper[i];
            for (offset, row) in lower.iter_mut().enumerate() {
                let factor = row[i] / pivot[i];
                if factor == 0.0 {
                    continue;
                }
                for j in i..cols {
                    row[j] -= factor * pivot[j];
                }
                b[i + 1 + offset] -= factor * b[i];
            }
        }

        // Back substitution
        let mut x = vec![0.0; cols];
        for i in (0..cols).rev() {
            x[i] = b[i] / a[i][i];
            for k in 0..i {
                b[k] -= a[k][i] * x[i];
            }
        }

        if rows > cols {
            check_consistency(coefficients, constants, &x)?;
        }
        Ok(x)
    }
}

/// Fails on the first equation that `x` misses beyond tolerance.
fn check_consistency(coefficients: &[Vec<f64>], constants: &[f64], x: &[f64]) -> Result<()> {
    for (row, (equation, &constant)) in coefficients.iter().zip(constants).enumerate() {
        let (value, scale) = equation
            .iter()
            .zip(x)
            .fold((0.0, constant.abs()), |(sum, scale), (a, x)| {
                (sum + a * x, scale + (a * x).abs())
            });
        let residual = (value - constant).abs();
        if !(residual <= CONSISTENCY_TOLERANCE * (1.0 + scale)) {
            return Err(Error::InconsistentSystem { row, residual });
        }
    }
    Ok(())
}

/// Solves `coefficients · x = constants` with the default
/// [`GaussElimination`] solver.
pub fn solve(coefficients: &[Vec<f64>], constants: &[f64]) -> Result<Vec<f64>> {
    GaussElimination::default().solve(coefficients, constants)
}

/// Largest absolute residual `max_i |(A·x)_i - b_i|`.
pub fn residual(coefficients: &[Vec<f64>], x: &[f64], constants: &[f64]) -> Result<f64> {
    let ax = mat_vec(coefficients, x)?;
    if ax.len() != constants.len() {
        return Err(Error::DimensionMismatch(format!(
            "{} equations but {} constants",
            ax.len(),
            constants.len()
        )));
    }
    Ok(ax
        .iter()
        .zip(constants)
        .map(|(l, r)| (l - r).abs())
        .fold(0.0, f64::max))
}
