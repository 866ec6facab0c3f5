//! Policy evaluation: from an encoding to a mean cost.
//!
//! # Stationary distribution
//!
//! `π` solves `π = πP` with `Σπ = 1`. Transposed, the balance equations
//! read `(Pᵀ − I)·π = 0`, which has rank `n − 1` for an irreducible chain.
//! Appending the normalization row `1ᵀ·π = 1` gives an `(n+1) × n` system
//! with a unique solution, solved by Gaussian elimination. A chain with
//! several closed classes leaves the system rank-deficient and the solve
//! fails with [`Error::SingularSystem`].
//!
//! # References
//!
//! - Stewart (1994), *Introduction to the Numerical Solution of Markov
//!   Chains*, Ch. 2
//! - Puterman (1994), *Markov Decision Processes*, §8.2

use crate::error::{Error, Result};
use crate::linalg::{shape, transpose, GaussElimination, LinearSolver, Matrix};
use crate::markov::MarkovAction;

/// Tolerance for `Σπ = 1`.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Checks an encoding against `states` states and `actions` actions.
pub fn validate_encoding(encoding: &[usize], states: usize, actions: usize) -> Result<()> {
    if encoding.len() != states {
        return Err(Error::InvalidEncoding(format!(
            "encoding has {} genes, the model has {states} states",
            encoding.len()
        )));
    }
    if let Some((state, &action)) = encoding.iter().enumerate().find(|(_, &a)| a >= actions) {
        return Err(Error::InvalidEncoding(format!(
            "state {state} uses action {action}, only {actions} actions exist"
        )));
    }
    Ok(())
}

/// Transition matrix induced by a policy.
///
/// Row `i` is row `i` of the matrix of the action chosen in state `i`.
pub fn infer_transition_matrix(encoding: &[usize], actions: &[MarkovAction]) -> Result<Matrix> {
    let states = actions.first().map_or(0, MarkovAction::state_count);
    validate_encoding(encoding, states, actions.len())?;
    Ok(encoding
        .iter()
        .enumerate()
        .map(|(state, &action)| actions[action].row(state).to_vec())
        .collect())
}

/// Per-state cost of a policy: `costs[i] = table[i][encoding[i]]`.
pub fn infer_costs(encoding: &[usize], table: &[Vec<f64>]) -> Result<Vec<f64>> {
    let (states, actions) = shape(table)?;
    validate_encoding(encoding, states, actions)?;
    Ok(encoding
        .iter()
        .zip(table)
        .map(|(&action, row)| row[action])
        .collect())
}

/// Stationary distribution of a row-stochastic matrix, default solver.
pub fn stationary_distribution(transition_matrix: &[Vec<f64>]) -> Result<Vec<f64>> {
    stationary_distribution_with(&GaussElimination::default(), transition_matrix)
}

/// Stationary distribution of a row-stochastic matrix.
///
/// # Errors
///
/// [`Error::SingularSystem`] when `π` is not unique;
/// [`Error::InconsistentSystem`] when the balance equations cannot all
/// hold, which only happens for a matrix that is not row-stochastic;
/// [`Error::DimensionMismatch`] for an empty or non-square matrix.
pub fn stationary_distribution_with<S: LinearSolver + ?Sized>(
    solver: &S,
    transition_matrix: &[Vec<f64>],
) -> Result<Vec<f64>> {
    let (rows, cols) = shape(transition_matrix)?;
    if rows == 0 || rows != cols {
        return Err(Error::DimensionMismatch(format!(
            "transition matrix is {rows}x{cols}, expected non-empty square"
        )));
    }
    let n = rows;

    // Rows 0..n: (Pᵀ − I); row n: all ones.
    let mut system = transpose(transition_matrix)?;
    for (i, row) in system.iter_mut().enumerate() {
        row[i] -= 1.0;
    }
    system.push(vec![1.0; n]);

    let mut constants = vec![0.0; n + 1];
    constants[n] = 1.0;

    solver.solve(&system, &constants)
}

/// Expected cost per step: `Σ costs[i]·π[i]`.
pub fn mean_cost(costs: &[f64], stationary: &[f64]) -> Result<f64> {
    if costs.len() != stationary.len() {
        return Err(Error::DimensionMismatch(format!(
            "{} costs for {} stationary probabilities",
            costs.len(),
            stationary.len()
        )));
    }
    Ok(costs.iter().zip(stationary).map(|(c, p)| c * p).sum())
}

/// Whether `π` sums to one within `tolerance`.
pub fn is_normalized(stationary: &[f64], tolerance: f64) -> bool {
    (stationary.iter().sum::<f64>() - 1.0).abs() <= tolerance
}
