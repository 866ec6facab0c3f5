//! Genetic Algorithm framework.
//!
//! A generic, domain-agnostic GA built on independent strategy traits.
//! A problem implements [`GaProblem`] (how to create and evaluate
//! individuals); how parents are chosen, combined and perturbed is decided
//! by the [`Selection`], [`Crossover`] and [`Mutation`] strategies handed to
//! [`GaRunner`].
//!
//! # Core Traits
//!
//! - [`Individual`]: A candidate solution with an encoding and a cached fitness
//! - [`GaProblem`]: Problem definition (initialization, evaluation, stop predicate)
//! - [`Selection`], [`Crossover`], [`Mutation`]: Evolutionary strategies
//!
//! # Key Types
//!
//! - [`FitnessDirection`]: Whether lower or higher fitness wins
//! - [`GaConfig`]: Algorithm parameters (population size, rates, plateau)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Final optimization result with per-generation statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
mod operators;
mod runner;
mod selection;
mod types;

pub use config::{selected_count, GaConfig};
pub use operators::{
    crossover_at, resample_mutation, single_point_crossover, Crossover, Mutation,
    ResampleMutation, SinglePointCrossover,
};
pub use runner::{GaResult, GaRunner, GenerationStats, StopReason};
pub use selection::{Elitism, Selection, Tournament};
pub use types::{FitnessDirection, GaProblem, Individual};
