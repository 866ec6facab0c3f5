//! Markov decision process policy search.
//!
//! A policy picks one action per state. Its fitness is the long-run mean
//! cost `Σ cost[i]·π[i]`, where `π` is the stationary distribution of the
//! transition matrix the policy induces (lower is better). Policies whose
//! induced chain has no unique stationary distribution get the fitness
//! `f64::INFINITY`, so selection discards them without aborting the run.
//!
//! # Key Types
//!
//! - [`MdpModel`]: actions and cost table, shared by all policies
//! - [`Policy`]: the GA individual, with cached derived values
//! - [`PolicySearch`]: the [`GaProblem`](crate::ga::GaProblem) driving the search
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use u_markov_ga::ga::{FitnessDirection, GaConfig};
//! use u_markov_ga::markov::MarkovAction;
//! use u_markov_ga::mdp::{MdpModel, PolicySearch};
//!
//! let wait = MarkovAction::new("wait", "Wait", vec![vec![0.9, 0.1], vec![0.5, 0.5]])?;
//! let fix = MarkovAction::new("fix", "Fix", vec![vec![1.0, 0.0], vec![1.0, 0.0]])?;
//! let model = MdpModel::new(vec![wait, fix], vec![vec![0.0, 2.0], vec![10.0, 4.0]])?;
//!
//! let search = PolicySearch::new(Arc::new(model));
//! let config = GaConfig::new(FitnessDirection::Ascending)
//!     .with_population_size(20)
//!     .with_seed(1);
//! let result = search.run(config)?;
//! assert_eq!(result.best.actions(), &[0, 1]);
//! # Ok::<(), u_markov_ga::Error>(())
//! ```

mod evaluator;
mod model;
mod policy;
mod search;

pub use evaluator::{
    infer_costs, infer_transition_matrix, is_normalized, mean_cost, stationary_distribution,
    stationary_distribution_with, validate_encoding, NORMALIZATION_TOLERANCE,
};
pub use model::MdpModel;
pub use policy::{Policy, PolicyReport, StateReport};
pub use search::PolicySearch;
