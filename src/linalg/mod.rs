//! Dense linear algebra for small systems.
//!
//! Provides the [`LinearSolver`] seam with a [`GaussElimination`]
//! implementation, plus the handful of matrix helpers the Markov code
//! needs. Everything is `f64`, row-major, and sized for systems of a few
//! dozen unknowns.

mod gauss;
mod matrix;

pub use gauss::{residual, solve, GaussElimination, LinearSolver, DEFAULT_PIVOT_TOLERANCE};
pub use matrix::{average, identity, mat_vec, max_abs_diff, shape, transpose, vec_mat, Matrix};
