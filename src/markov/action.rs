//! Named actions with their transition matrices.

use crate::error::{Error, Result};
use crate::linalg::{shape, Matrix};
use rand::Rng;

/// Tolerance for a row of probabilities to count as summing to one.
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Checks that every row of `matrix` is a probability distribution.
///
/// Entries must be finite and in `[0, 1]`, and each row must sum to 1
/// within `tolerance`. Returns a description of the first violation.
pub fn check_row_stochastic(matrix: &[Vec<f64>], tolerance: f64) -> std::result::Result<(), String> {
    let (rows, cols) = shape(matrix).map_err(|e| e.to_string())?;
    if rows == 0 {
        return Err("matrix is empty".into());
    }
    if rows != cols {
        return Err(format!("matrix is {rows}x{cols}, expected square"));
    }
    for (i, row) in matrix.iter().enumerate() {
        if let Some((j, p)) = row
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p < 0.0 || **p > 1.0)
        {
            return Err(format!("entry ({i}, {j}) = {p} is not a probability"));
        }
        let sum: f64 = row.iter().sum();
        if (sum - 1.0).abs() > tolerance {
            return Err(format!("row {i} sums to {sum}"));
        }
    }
    Ok(())
}

/// An action of the decision process.
///
/// `transition_matrix[i][j]` is the probability of moving to state `j`
/// when this action is taken in state `i`. The matrix is validated on
/// construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ActionSpec"))]
pub struct MarkovAction {
    name: String,
    label: String,
    transition_matrix: Matrix,
}

impl MarkovAction {
    /// Creates an action, validating its transition matrix.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        transition_matrix: Matrix,
    ) -> Result<Self> {
        let name = name.into();
        check_row_stochastic(&transition_matrix, ROW_SUM_TOLERANCE).map_err(|reason| {
            Error::InvalidTransitionMatrix {
                action: name.clone(),
                reason,
            }
        })?;
        Ok(Self {
            name,
            label: label.into(),
            transition_matrix,
        })
    }

    /// Estimates an action from observed `(from, to)` transitions.
    ///
    /// Each row is the empirical frequency of successors of that state.
    /// Every state must have been observed at least once as a `from`.
    pub fn from_observations<I>(
        name: impl Into<String>,
        label: impl Into<String>,
        states: usize,
        observations: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let name = name.into();
        let mut counts = vec![vec![0u64; states]; states];
        for (from, to) in observations {
            if from >= states || to >= states {
                return Err(Error::DimensionMismatch(format!(
                    "observed transition {from} -> {to} outside {states} states"
                )));
            }
            counts[from][to] += 1;
        }

        let mut matrix = Vec::with_capacity(states);
        for (i, row) in counts.iter().enumerate() {
            let total: u64 = row.iter().sum();
            if total == 0 {
                return Err(Error::InvalidTransitionMatrix {
                    action: name,
                    reason: format!("state {i} has no observed transitions"),
                });
            }
            matrix.push(row.iter().map(|&c| c as f64 / total as f64).collect());
        }
        Self::new(name, label, matrix)
    }

    /// Machine name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The full transition matrix.
    pub fn transition_matrix(&self) -> &[Vec<f64>] {
        &self.transition_matrix
    }

    /// Outgoing probabilities from `state`.
    ///
    /// # Panics
    /// Panics if `state >= self.state_count()`.
    pub fn row(&self, state: usize) -> &[f64] {
        &self.transition_matrix[state]
    }

    /// Number of states the matrix covers.
    pub fn state_count(&self) -> usize {
        self.transition_matrix.len()
    }

    /// Samples the successor of `state` under this action.
    pub fn apply<R: Rng + ?Sized>(&self, state: usize, rng: &mut R) -> Result<usize> {
        let n = self.state_count();
        if state >= n {
            return Err(Error::DimensionMismatch(format!(
                "state {state} out of range for {n} states"
            )));
        }
        Ok(sample_row(&self.transition_matrix[state], rng))
    }
}

/// Inverse-CDF draw from one probability row.
pub(crate) fn sample_row<R: Rng + ?Sized>(row: &[f64], rng: &mut R) -> usize {
    let threshold: f64 = rng.random_range(0.0..1.0);
    let mut cumulative = 0.0;
    for (j, &p) in row.iter().enumerate() {
        cumulative += p;
        if threshold < cumulative {
            return j;
        }
    }
    // Rounding left the cumulative sum just under one.
    row.iter().rposition(|&p| p > 0.0).unwrap_or(0)
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ActionSpec {
    name: String,
    label: String,
    transition_matrix: Matrix,
}

#[cfg(feature = "serde")]
impl TryFrom<ActionSpec> for MarkovAction {
    type Error = Error;

    fn try_from(raw: ActionSpec) -> Result<Self> {
        Self::new(raw.name, raw.label, raw.transition_matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn weather() -> MarkovAction {
        MarkovAction::new(
            "weather",
            "Weather",
            vec![vec![0.9, 0.1, 0.0], vec![0.5, 0.0, 0.5], vec![0.0, 0.0, 1.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_accepts_row_stochastic() {
        let action = weather();
        assert_eq!(action.name(), "weather");
        assert_eq!(action.label(), "Weather");
        assert_eq!(action.state_count(), 3);
        assert_eq!(action.row(1), &[0.5, 0.0, 0.5]);
    }

    #[test]
    fn test_rejects_bad_row_sum() {
        let err = MarkovAction::new("a", "A", vec![vec![0.5, 0.4], vec![0.5, 0.5]]).unwrap_err();
        match err {
            Error::InvalidTransitionMatrix { action, reason } => {
                assert_eq!(action, "a");
                assert!(reason.contains("row 0"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_rejects_negative_and_non_square() {
        assert!(MarkovAction::new("a", "A", vec![vec![1.5, -0.5], vec![0.5, 0.5]]).is_err());
        assert!(MarkovAction::new("a", "A", vec![vec![0.5, 0.5]]).is_err());
        assert!(MarkovAction::new("a", "A", vec![]).is_err());
    }

    #[test]
    fn test_apply_respects_zero_probabilities() {
        let action = weather();
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            assert_ne!(action.apply(0, &mut rng).unwrap(), 2);
            assert_ne!(action.apply(1, &mut rng).unwrap(), 1);
            assert_eq!(action.apply(2, &mut rng).unwrap(), 2);
        }
    }

    #[test]
    fn test_apply_frequencies() {
        let action = weather();
        let mut rng = create_rng(7);
        let n = 20_000;
        let to_zero = (0..n)
            .filter(|_| action.apply(1, &mut rng).unwrap() == 0)
            .count();
        let freq = to_zero as f64 / n as f64;
        assert!((freq - 0.5).abs() < 0.02, "frequency {freq}");
    }

    #[test]
    fn test_apply_out_of_range() {
        let mut rng = create_rng(1);
        assert!(weather().apply(3, &mut rng).is_err());
    }

    #[test]
    fn test_from_observations() {
        let obs = vec![(0, 0), (0, 1), (0, 1), (0, 1), (1, 0)];
        let action = MarkovAction::from_observations("obs", "Observed", 2, obs).unwrap();
        assert_eq!(action.row(0), &[0.25, 0.75]);
        assert_eq!(action.row(1), &[1.0, 0.0]);
    }

    #[test]
    fn test_from_observations_missing_state() {
        let err = MarkovAction::from_observations("obs", "Observed", 2, vec![(0, 1)]).unwrap_err();
        assert!(matches!(err, Error::InvalidTransitionMatrix { .. }));
        assert!(MarkovAction::from_observations("obs", "Observed", 2, vec![(0, 2)]).is_err());
    }
}
