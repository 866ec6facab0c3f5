//! Genetic-algorithm policy search for finite Markov decision processes.
//!
//! Finds the policy (one action per state) with the lowest long-run
//! average cost. Each candidate is ranked by solving its stationary
//! distribution with Gaussian elimination.
//!
//! - **[`ga`]**: A generic Genetic Algorithm with pluggable selection,
//!   crossover, and mutation strategies, direction-aware fitness, and
//!   plateau-based early stopping.
//! - **[`mdp`]**: The decision-process model, the policy individual with
//!   its cached stationary distribution, and the search problem.
//! - **[`markov`]**: Named actions with validated row-stochastic matrices,
//!   estimated from observations or given directly.
//! - **[`linalg`]**: Dense matrix helpers and the linear solver.
//!
//! # Features
//!
//! - `parallel`: evaluate each generation with rayon when
//!   [`GaConfig::parallel`](ga::GaConfig::parallel) is set.
//! - `serde`: `Serialize`/`Deserialize` on configuration, actions, and
//!   reports.
//!
//! Logging goes through the `log` facade; no logger is installed.

pub mod error;
pub mod ga;
pub mod linalg;
pub mod markov;
pub mod mdp;
pub mod random;

pub use error::{Error, Result};
