//! Crate-wide error type.

use thiserror::Error;

/// Errors raised by the solver, the MDP model, and the GA runner.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Gaussian elimination found no pivot above tolerance.
    ///
    /// For a stationary-distribution solve this means the induced chain is
    /// reducible (several closed classes), so `π` is not unique.
    #[error("singular system: no usable pivot in column {column} (largest magnitude {magnitude:e})")]
    SingularSystem { column: usize, magnitude: f64 },

    /// An overdetermined system whose extra equations contradict the
    /// solution of the pivot rows.
    #[error("inconsistent system: equation {row} misses by {residual:e}")]
    InconsistentSystem { row: usize, residual: f64 },

    /// An encoding does not match the model it is evaluated against.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Inconsistent algorithm or strategy parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Non-conforming matrix or vector shapes.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// An action matrix that is not square row-stochastic.
    #[error("invalid transition matrix for action `{action}`: {reason}")]
    InvalidTransitionMatrix { action: String, reason: String },
}

impl Error {
    /// Whether a run may continue after this error.
    ///
    /// Only an unsolvable system (singular or inconsistent) is
    /// recoverable: the candidate is ranked last instead of aborting the
    /// search. Everything else is a precondition violation.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::SingularSystem { .. } | Error::InconsistentSystem { .. }
        )
    }
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unsolvable_systems_are_recoverable() {
        let singular = Error::SingularSystem {
            column: 1,
            magnitude: 0.0,
        };
        assert!(singular.is_recoverable());
        let inconsistent = Error::InconsistentSystem {
            row: 1,
            residual: 1.0,
        };
        assert!(inconsistent.is_recoverable());
        assert!(!Error::InvalidEncoding("x".into()).is_recoverable());
        assert!(!Error::Configuration("x".into()).is_recoverable());
        assert!(!Error::DimensionMismatch("x".into()).is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let err = Error::InvalidTransitionMatrix {
            action: "hold".into(),
            reason: "row 2 sums to 0.9".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid transition matrix for action `hold`: row 2 sums to 0.9"
        );
        assert_eq!(
            Error::Configuration("population_size must be at least 2".into()).to_string(),
            "configuration error: population_size must be at least 2"
        );
    }
}
