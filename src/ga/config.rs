//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::types::FitnessDirection;
use crate::error::{Error, Result};

/// Configuration for the Genetic Algorithm.
///
/// Controls population size, selection and mutation rates, termination
/// conditions, and parallelism. The fitness direction has no default and
/// must be passed to [`GaConfig::new`].
///
/// Setters store values as given; [`validate`](Self::validate) (called by
/// [`GaRunner::new`](super::GaRunner::new)) rejects anything inconsistent.
///
/// # Builder Pattern
///
/// ```
/// use u_markov_ga::ga::{FitnessDirection, GaConfig};
///
/// let config = GaConfig::new(FitnessDirection::Ascending)
///     .with_population_size(60)
///     .with_selection_rate(0.5)
///     .with_mutation_rate(0.05)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.selected_count(), 30);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Which end of the fitness scale is better.
    pub direction: FitnessDirection,

    /// Number of individuals in every generation.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_iterations: usize,

    /// Fraction of the population kept as the parent pool (0.0–1.0].
    ///
    /// `⌊population_size · selection_rate⌋` individuals survive each
    /// generation and mate to refill the rest.
    pub selection_rate: f64,

    /// Per-gene mutation probability handed to the mutation strategy.
    pub mutation_rate: f64,

    /// Best-fitness changes below this value count as a plateau.
    pub plateau_tolerance: f64,

    /// Generations a plateau may last before the run stops.
    ///
    /// The run stops once more than `plateau_window` generations have
    /// passed since the last above-tolerance change.
    pub plateau_window: usize,

    /// Whether to evaluate individuals in parallel (`parallel` feature).
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked at the start of each generation, so the actual runtime may
    /// exceed it by one generation.
    pub time_limit_ms: Option<u64>,
}

impl GaConfig {
    /// Creates a configuration with the given direction and default
    /// parameters: population 100, 100 iterations, selection rate 0.5,
    /// mutation rate 0.1, plateau tolerance 0.001 over a window of 4.
    pub fn new(direction: FitnessDirection) -> Self {
        Self {
            direction,
            population_size: 100,
            max_iterations: 100,
            selection_rate: 0.5,
            mutation_rate: 0.1,
            plateau_tolerance: 0.001,
            plateau_window: 4,
            parallel: false,
            seed: None,
            time_limit_ms: None,
        }
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the selection rate.
    pub fn with_selection_rate(mut self, rate: f64) -> Self {
        self.selection_rate = rate;
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the plateau tolerance.
    pub fn with_plateau_tolerance(mut self, tolerance: f64) -> Self {
        self.plateau_tolerance = tolerance;
        self
    }

    /// Sets the plateau window.
    pub fn with_plateau_window(mut self, window: usize) -> Self {
        self.plateau_window = window;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Size of the parent pool: `⌊population_size · selection_rate⌋`.
    pub fn selected_count(&self) -> usize {
        selected_count(self.population_size, self.selection_rate)
    }

    /// Validates the configuration.
    ///
    /// Returns [`Error::Configuration`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(Error::Configuration("population_size must be at least 2".into()));
        }
        if self.max_iterations == 0 {
            return Err(Error::Configuration("max_iterations must be at least 1".into()));
        }
        if !(self.selection_rate > 0.0 && self.selection_rate <= 1.0) {
            return Err(Error::Configuration(format!(
                "selection_rate must be in (0, 1], got {}",
                self.selection_rate
            )));
        }
        let selected = self.selected_count();
        if selected < 2 {
            return Err(Error::Configuration(format!(
                "selection keeps {selected} individuals; at least 2 are needed to mate"
            )));
        }
        if selected >= self.population_size {
            return Err(Error::Configuration(
                "selection keeps the whole population; no room for offspring".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::Configuration(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !(self.plateau_tolerance >= 0.0) {
            return Err(Error::Configuration(format!(
                "plateau_tolerance must be non-negative, got {}",
                self.plateau_tolerance
            )));
        }
        if self.time_limit_ms == Some(0) {
            return Err(Error::Configuration("time_limit_ms must be positive or None".into()));
        }
        Ok(())
    }
}

/// `⌊n · rate⌋`, the number of individuals a selection keeps.
pub fn selected_count(n: usize, rate: f64) -> usize {
    (n as f64 * rate).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let config = GaConfig::new(FitnessDirection::Ascending);
        assert_eq!(config.direction, FitnessDirection::Ascending);
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_iterations, 100);
        assert!((config.selection_rate - 0.5).abs() < 1e-15);
        assert!((config.mutation_rate - 0.1).abs() < 1e-15);
        assert!((config.plateau_tolerance - 0.001).abs() < 1e-15);
        assert_eq!(config.plateau_window, 4);
        assert!(!config.parallel);
        assert!(config.seed.is_none());
        assert!(config.time_limit_ms.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_direction_is_kept() {
        let config = GaConfig::new(FitnessDirection::Descending).with_seed(1);
        assert_eq!(config.direction, FitnessDirection::Descending);
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::new(FitnessDirection::Ascending)
            .with_population_size(40)
            .with_max_iterations(250)
            .with_selection_rate(0.25)
            .with_mutation_rate(0.02)
            .with_plateau_tolerance(1e-6)
            .with_plateau_window(10)
            .with_parallel(true)
            .with_seed(7)
            .with_time_limit_ms(500);

        assert_eq!(config.population_size, 40);
        assert_eq!(config.max_iterations, 250);
        assert_eq!(config.selected_count(), 10);
        assert!((config.mutation_rate - 0.02).abs() < 1e-15);
        assert!((config.plateau_tolerance - 1e-6).abs() < 1e-18);
        assert_eq!(config.plateau_window, 10);
        assert!(config.parallel);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.time_limit_ms, Some(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_selected_count_floors() {
        assert_eq!(selected_count(10, 0.55), 5);
        assert_eq!(selected_count(7, 0.5), 3);
        assert_eq!(selected_count(100, 1.0), 100);
    }

    #[test]
    fn test_validate_rejects_small_population() {
        let config = GaConfig::new(FitnessDirection::Ascending).with_population_size(1);
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let config = GaConfig::new(FitnessDirection::Ascending).with_max_iterations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_selection_rates() {
        let base = GaConfig::new(FitnessDirection::Ascending).with_population_size(10);
        assert!(base.clone().with_selection_rate(0.0).validate().is_err());
        assert!(base.clone().with_selection_rate(1.5).validate().is_err());
        assert!(base.clone().with_selection_rate(f64::NAN).validate().is_err());
        // keeps 1: nobody to mate with
        assert!(base.clone().with_selection_rate(0.15).validate().is_err());
        // keeps all 10: no offspring slots
        assert!(base.clone().with_selection_rate(1.0).validate().is_err());
        assert!(base.with_selection_rate(0.2).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_rates_without_clamping() {
        let config = GaConfig::new(FitnessDirection::Ascending).with_mutation_rate(1.5);
        assert!((config.mutation_rate - 1.5).abs() < 1e-15);
        assert!(config.validate().is_err());
        assert!(GaConfig::new(FitnessDirection::Ascending)
            .with_mutation_rate(-0.1)
            .validate()
            .is_err());
        assert!(GaConfig::new(FitnessDirection::Ascending)
            .with_plateau_tolerance(-1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_zero_time_limit() {
        let config = GaConfig::new(FitnessDirection::Ascending).with_time_limit_ms(0);
        assert!(config.validate().is_err());
        let config = GaConfig::new(FitnessDirection::Ascending).with_time_limit_ms(1);
        assert!(config.validate().is_ok());
    }
}
