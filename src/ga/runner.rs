//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the evolutionary process:
//! initialization → evaluation → selection → crossover → mutation →
//! evaluation → repeat, until a solution is found, the best fitness
//! plateaus, or the iteration budget runs out.

use super::config::GaConfig;
use super::operators::{Crossover, Mutation};
use super::selection::Selection;
use super::types::{ranked_fitness, FitnessDirection, GaProblem, Individual};
use crate::error::{Error, Result};
use crate::random::create_rng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The problem's solution predicate accepted a generation's fittest.
    SolutionFound,
    /// The best fitness stayed within tolerance for longer than the window.
    Plateau,
    /// `max_iterations` generations were executed.
    MaxIterations,
    /// The cancellation flag was raised.
    Cancelled,
    /// The wall-clock limit elapsed.
    TimeLimit,
}

/// Statistics recorded after each generation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation number; 0 is the initial population.
    pub generation: usize,
    /// Fitness of this generation's fittest individual.
    pub best_fitness: f64,
    /// Best fitness seen so far, this generation included.
    pub best_ever_fitness: f64,
    /// `|best_fitness - previous generation's best_fitness|`.
    pub variation: f64,
}

/// Result of a GA optimization run.
///
/// A run always yields its best individual, whatever the stop reason;
/// inspect [`stop_reason`](Self::stop_reason) and
/// [`generations`](Self::generations) to tell a converged search from an
/// exhausted one.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The fittest individual observed during the entire run.
    pub best: I,

    /// Fitness of `best`.
    pub best_fitness: f64,

    /// Number of generations executed (initialization excluded).
    pub generations: usize,

    /// Why the run ended.
    pub stop_reason: StopReason,

    /// One entry for the initial population plus one per generation.
    pub history: Vec<GenerationStats>,
}

impl<I: Individual> GaResult<I> {
    /// Best-ever fitness after each generation.
    pub fn fitness_history(&self) -> Vec<f64> {
        self.history.iter().map(|s| s.best_ever_fitness).collect()
    }
}

/// Executes the GA evolutionary loop with injected strategies.
///
/// # Usage
///
/// ```ignore
/// let config = GaConfig::new(FitnessDirection::Ascending).with_seed(42);
/// let runner = GaRunner::new(
///     config,
///     Elitism::new(FitnessDirection::Ascending),
///     SinglePointCrossover,
///     ResampleMutation::new(actions)?,
/// )?;
/// let result = runner.run(&problem)?;
/// println!("Best fitness: {}", result.best_fitness);
/// ```
#[derive(Debug, Clone)]
pub struct GaRunner<S, C, M> {
    config: GaConfig,
    selection: S,
    crossover: C,
    mutation: M,
}

impl<S: Selection, C, M> GaRunner<S, C, M> {
    /// Builds a runner, validating the configuration and the selection
    /// strategy against it.
    ///
    /// Inconsistent parameters are reported as
    /// [`Error::Configuration`]; nothing is clamped.
    pub fn new(config: GaConfig, selection: S, crossover: C, mutation: M) -> Result<Self> {
        config.validate()?;
        selection.validate(config.population_size, config.selection_rate)?;
        Ok(Self {
            config,
            selection,
            crossover,
            mutation,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the GA optimization.
    pub fn run<P>(&self, problem: &P) -> Result<GaResult<P::Individual>>
    where
        P: GaProblem,
        C: Crossover<P::Individual>,
        M: Mutation<P::Individual>,
    {
        self.run_with_cancel(problem, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before the next generation and returns the best solution found so
    /// far.
    pub fn run_with_cancel<P>(
        &self,
        problem: &P,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Individual>>
    where
        P: GaProblem,
        C: Crossover<P::Individual>,
        M: Mutation<P::Individual>,
    {
        let config = &self.config;
        let direction = config.direction;
        let started = Instant::now();

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        // 1. Initialize population
        let mut population = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect::<Result<Vec<_>>>()?;
        evaluate_population(problem, &mut population, config.parallel)?;

        // 2. Track best
        let mut best = fittest(&population, direction)?.clone();
        let mut previous_best = ranked_fitness(&best, direction);
        let mut history = Vec::with_capacity(config.max_iterations + 1);
        history.push(GenerationStats {
            generation: 0,
            best_fitness: previous_best,
            best_ever_fitness: previous_best,
            variation: 0.0,
        });

        let mut last_big_variation = 0usize;
        let mut generations = 0usize;
        let (mut stop_reason, budget) = if problem.solution_is_found(&best) {
            (StopReason::SolutionFound, 0)
        } else {
            (StopReason::MaxIterations, config.max_iterations)
        };

        // 3. Evolutionary loop
        for generation in 0..budget {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    stop_reason = StopReason::Cancelled;
                    break;
                }
            }
            if let Some(limit) = config.time_limit_ms {
                if started.elapsed().as_millis() >= u128::from(limit) {
                    stop_reason = StopReason::TimeLimit;
                    break;
                }
            }

            let selected = self
                .selection
                .select(population, config.selection_rate, &mut rng)?;
            population = self.repopulate(selected, &mut rng)?;
            evaluate_population(problem, &mut population, config.parallel)?;
            generations = generation + 1;

            let current = fittest(&population, direction)?;
            let current_fitness = ranked_fitness(current, direction);
            if direction.is_fitter(current_fitness, ranked_fitness(&best, direction)) {
                best = current.clone();
            }
            let best_fitness = ranked_fitness(&best, direction);
            let variation = fitness_variation(current_fitness, previous_best);
            previous_best = current_fitness;

            history.push(GenerationStats {
                generation: generations,
                best_fitness: current_fitness,
                best_ever_fitness: best_fitness,
                variation,
            });
            log::debug!(
                "generation {generations}: best {current_fitness}, best ever {best_fitness}, variation {variation}"
            );
            problem.on_generation(generations, best_fitness);

            if problem.solution_is_found(current) {
                stop_reason = StopReason::SolutionFound;
                break;
            }

            if variation >= config.plateau_tolerance {
                last_big_variation = generation;
            } else if generation - last_big_variation > config.plateau_window {
                stop_reason = StopReason::Plateau;
                break;
            }
        }

        let best_fitness = ranked_fitness(&best, direction);
        log::info!(
            "GA stopped after {generations} generations ({stop_reason:?}), best fitness {best_fitness}"
        );

        Ok(GaResult {
            best,
            best_fitness,
            generations,
            stop_reason,
            history,
        })
    }

    /// Builds the next generation from the selected pool.
    ///
    /// The selected individuals carry over unchanged. Pairs are then drawn
    /// from the pool without replacement and mated; each child is mutated
    /// and appended. When a pass leaves fewer than two unpaired members
    /// (an odd pool leaves one, which simply carries over), a new pass
    /// over the whole pool starts, until the population is full again.
    /// Surplus children of the final mating are dropped.
    fn repopulate<I, R>(&self, selected: Vec<I>, rng: &mut R) -> Result<Vec<I>>
    where
        I: Individual,
        C: Crossover<I>,
        M: Mutation<I>,
        R: Rng,
    {
        let target = self.config.population_size;
        let pool_size = selected.len();
        if pool_size < 2 {
            return Err(Error::Configuration(format!(
                "selection returned {pool_size} individuals; at least 2 are needed to mate"
            )));
        }

        let mut next = selected;
        next.reserve(target.saturating_sub(pool_size));

        while next.len() < target {
            let before = next.len();
            let mut unpaired: Vec<usize> = (0..pool_size).collect();
            while unpaired.len() >= 2 && next.len() < target {
                let a = unpaired.swap_remove(rng.random_range(0..unpaired.len()));
                let b = unpaired.swap_remove(rng.random_range(0..unpaired.len()));
                let children = self.crossover.mate(&next[a], &next[b], rng)?;
                for mut child in children {
                    if next.len() >= target {
                        break;
                    }
                    self.mutation
                        .mutate(&mut child, self.config.mutation_rate, rng)?;
                    next.push(child);
                }
            }
            if next.len() == before {
                return Err(Error::Configuration(
                    "crossover produced no offspring".into(),
                ));
            }
        }
        Ok(next)
    }
}

/// `|a - b|`, with equal values (infinities included) giving zero.
fn fitness_variation(a: f64, b: f64) -> f64 {
    if a == b {
        0.0
    } else {
        (a - b).abs()
    }
}

/// The fittest individual; the first one wins ties.
fn fittest<I: Individual>(population: &[I], direction: FitnessDirection) -> Result<&I> {
    population
        .iter()
        .min_by(|a, b| direction.compare(ranked_fitness(*a, direction), ranked_fitness(*b, direction)))
        .ok_or_else(|| Error::Configuration("population is empty".into()))
}

/// Evaluates every individual without a cached fitness.
fn evaluate_population<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    parallel: bool,
) -> Result<()> {
    if parallel {
        evaluate_parallel(problem, population)
    } else {
        evaluate_sequential(problem, population)
    }
}

fn evaluate_sequential<P: GaProblem>(problem: &P, population: &mut [P::Individual]) -> Result<()> {
    for ind in population.iter_mut().filter(|ind| ind.fitness().is_none()) {
        problem.evaluate(ind)?;
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn evaluate_parallel<P: GaProblem>(problem: &P, population: &mut [P::Individual]) -> Result<()> {
    use rayon::prelude::*;

    population
        .par_iter_mut()
        .filter(|ind| ind.fitness().is_none())
        .try_for_each(|ind| problem.evaluate(ind).map(|_| ()))
}

#[cfg(not(feature = "parallel"))]
fn evaluate_parallel<P: GaProblem>(problem: &P, population: &mut [P::Individual]) -> Result<()> {
    evaluate_sequential(problem, population)
}

// ============================================================================
// Tests
// ============================================================================
