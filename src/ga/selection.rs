//! Selection strategies for the GA.
//!
//! A selection keeps `⌊N · rate⌋` individuals of the current population as
//! survivors and parent pool. Strategies are stateless; they only read
//! fitness values and the random source.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::config::selected_count;
use super::types::{ranked_fitness, FitnessDirection, Individual};
use crate::error::{Error, Result};
use crate::random::unique_indices;
use rand::Rng;

/// Chooses which individuals survive into the parent pool.
pub trait Selection: Send + Sync {
    /// Returns `⌊individuals.len() · rate⌋` individuals taken from
    /// `individuals`, each at most once.
    fn select<I: Individual, R: Rng>(
        &self,
        individuals: Vec<I>,
        rate: f64,
        rng: &mut R,
    ) -> Result<Vec<I>>;

    /// Checks that the strategy can run on populations of
    /// `population_size` with the given rate.
    ///
    /// Called once when the runner is built. The default accepts anything.
    fn validate(&self, _population_size: usize, _rate: f64) -> Result<()> {
        Ok(())
    }
}

/// Keeps the fittest individuals.
///
/// Sorts by fitness according to `direction` and keeps the top
/// `⌊N · rate⌋`. The sort is stable, so equal fitness keeps input order.
///
/// # Complexity
/// O(n log n)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elitism {
    /// Which end of the fitness scale counts as elite.
    pub direction: FitnessDirection,
}

impl Elitism {
    /// Creates an elitism selection for the given direction.
    pub fn new(direction: FitnessDirection) -> Self {
        Self { direction }
    }
}

impl Selection for Elitism {
    fn select<I: Individual, R: Rng>(
        &self,
        mut individuals: Vec<I>,
        rate: f64,
        _rng: &mut R,
    ) -> Result<Vec<I>> {
        let count = selected_count(individuals.len(), rate);
        let direction = self.direction;
        individuals.sort_by(|a, b| {
            direction.compare(ranked_fitness(a, direction), ranked_fitness(b, direction))
        });
        individuals.truncate(count);
        Ok(individuals)
    }
}

/// Tournament selection without replacement.
///
/// Repeats `⌊N · rate⌋` times: draw `size` distinct contestants from the
/// individuals not yet selected and keep the one with the highest **raw**
/// fitness (first-drawn wins ties). The pool shrinks by one per round, so
/// nobody is selected twice.
///
/// Tournaments always maximize. To minimize with a tournament, the problem
/// must negate its fitness values.
///
/// Higher `size` = stronger selection pressure.
///
/// # Complexity
/// O(size) per round plus O(1) removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tournament {
    size: usize,
}

impl Tournament {
    /// Creates a tournament with `size` contestants per round.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::Configuration("tournament size must be at least 1".into()));
        }
        Ok(Self { size })
    }

    /// Contestants per round.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Default for Tournament {
    fn default() -> Self {
        Self { size: 8 }
    }
}

impl Selection for Tournament {
    fn select<I: Individual, R: Rng>(
        &self,
        individuals: Vec<I>,
        rate: f64,
        rng: &mut R,
    ) -> Result<Vec<I>> {
        let count = selected_count(individuals.len(), rate);
        let mut remaining = individuals;
        let mut selected = Vec::with_capacity(count);

        for _ in 0..count {
            let contestants = unique_indices(remaining.len(), self.size, rng)?;
            let mut winner = contestants[0];
            let mut winner_score = raw_score(&remaining[winner]);
            for &idx in &contestants[1..] {
                let score = raw_score(&remaining[idx]);
                if score > winner_score {
                    winner = idx;
                    winner_score = score;
                }
            }
            selected.push(remaining.swap_remove(winner));
        }
        Ok(selected)
    }

    fn validate(&self, population_size: usize, rate: f64) -> Result<()> {
        let count = selected_count(population_size, rate);
        if count == 0 {
            return Ok(());
        }
        // Pool size in the last round.
        let last_pool = population_size + 1 - count;
        if self.size > last_pool {
            return Err(Error::Configuration(format!(
                "tournament size {} exceeds the {last_pool} individuals left in the last round",
                self.size
            )));
        }
        Ok(())
    }
}

/// Raw fitness for tournaments; unevaluated or NaN ranks lowest.
fn raw_score<I: Individual>(individual: &I) -> f64 {
    match individual.fitness() {
        Some(f) if !f.is_nan() => f,
        _ => f64::NEG_INFINITY,
    }
}
