//! Core trait definitions for the GA framework.
//!
//! [`Individual`] and [`GaProblem`] define the contract between the
//! generic engine and a concrete problem. [`FitnessDirection`] decides
//! which end of the fitness scale wins.

use crate::error::Result;
use rand::Rng;
use std::cmp::Ordering;

/// Which end of the fitness scale is better.
///
/// There is deliberately no default: every run states its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitnessDirection {
    /// Lower fitness is better (minimization, e.g. costs).
    Ascending,
    /// Higher fitness is better (maximization).
    Descending,
}

impl FitnessDirection {
    /// The worst possible fitness for this direction.
    ///
    /// Used as the rank of unevaluated individuals and of individuals that
    /// could not be evaluated.
    pub fn worst(self) -> f64 {
        match self {
            FitnessDirection::Ascending => f64::INFINITY,
            FitnessDirection::Descending => f64::NEG_INFINITY,
        }
    }

    /// Orders two fitness values best-first.
    ///
    /// `Ordering::Less` means `a` is fitter than `b`. NaN ranks as
    /// [`worst`](Self::worst).
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        let (a, b) = (self.sanitize(a), self.sanitize(b));
        match self {
            FitnessDirection::Ascending => a.total_cmp(&b),
            FitnessDirection::Descending => b.total_cmp(&a),
        }
    }

    /// Whether `a` is strictly fitter than `b`.
    pub fn is_fitter(self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    fn sanitize(self, f: f64) -> f64 {
        if f.is_nan() {
            self.worst()
        } else {
            f
        }
    }
}

/// A candidate solution in the GA population.
///
/// An individual owns an encoding and exposes a fitness derived from it.
/// Replacing the encoding must discard every cached derived value, so
/// [`fitness`](Individual::fitness) returns `None` until the individual is
/// evaluated again.
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone)]
/// struct Bits {
///     genes: Vec<usize>,
///     fitness: Option<f64>,
/// }
///
/// impl Individual for Bits {
///     type Encoding = Vec<usize>;
///     fn encoding(&self) -> &Vec<usize> { &self.genes }
///     fn set_encoding(&mut self, genes: Vec<usize>) -> Result<()> {
///         self.genes = genes;
///         self.fitness = None;
///         Ok(())
///     }
///     fn fitness(&self) -> Option<f64> { self.fitness }
/// }
/// ```
pub trait Individual: Clone + Send + Sync {
    /// The genotype representation.
    type Encoding: Clone + Send + Sync;

    /// Returns the encoding.
    fn encoding(&self) -> &Self::Encoding;

    /// Replaces the encoding and invalidates cached fitness.
    ///
    /// Implementations validate the new encoding against their problem and
    /// return [`Error::InvalidEncoding`](crate::Error::InvalidEncoding) on
    /// mismatch, leaving the individual unchanged.
    fn set_encoding(&mut self, encoding: Self::Encoding) -> Result<()>;

    /// Cached fitness, or `None` if not evaluated since the last
    /// encoding change.
    fn fitness(&self) -> Option<f64>;
}

/// Fitness used for ranking: unevaluated individuals rank last.
pub(crate) fn ranked_fitness<I: Individual>(individual: &I, direction: FitnessDirection) -> f64 {
    individual.fitness().unwrap_or_else(|| direction.worst())
}

/// Defines a GA optimization problem.
///
/// The problem supplies the random-individual generator, the fitness
/// evaluation, and an optional solution predicate. Selection, crossover
/// and mutation are separate strategies handed to
/// [`GaRunner`](super::GaRunner).
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because the runner may evaluate
/// individuals in parallel (`parallel` feature).
pub trait GaProblem: Send + Sync {
    /// The individual (solution) type for this problem.
    type Individual: Individual;

    /// Creates a random valid individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Result<Self::Individual>;

    /// Evaluates an individual, caching the result inside it, and returns
    /// its fitness.
    ///
    /// Only called for individuals whose [`Individual::fitness`] is
    /// `None`. An `Err` aborts the run; candidates that merely cannot be
    /// ranked should receive a sentinel fitness instead.
    fn evaluate(&self, individual: &mut Self::Individual) -> Result<f64>;

    /// Whether `individual` is good enough to stop immediately.
    ///
    /// Checked against the fittest individual of each generation. The
    /// default never stops.
    fn solution_is_found(&self, _individual: &Self::Individual) -> bool {
        false
    }

    /// Called at the end of each generation with the best-ever fitness.
    fn on_generation(&self, _generation: usize, _best_fitness: f64) {}
}
