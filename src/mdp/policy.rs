//! Policies as GA individuals.
//!
//! A [`Policy`] assigns one action to each state. The induced transition
//! matrix and per-state costs are derived from the encoding when it is
//! set; the stationary distribution and mean cost are solved on the first
//! [`evaluate`](Policy::evaluate) and cached until the encoding changes.

use std::sync::Arc;

use rand::Rng;

use super::evaluator::{
    infer_costs, infer_transition_matrix, is_normalized, mean_cost, stationary_distribution_with,
    validate_encoding, NORMALIZATION_TOLERANCE,
};
use super::model::MdpModel;
use crate::error::{Error, Result};
use crate::ga::Individual;
use crate::linalg::Matrix;
use crate::markov::sample_row;

/// Cached outcome of the stationary solve.
#[derive(Debug, Clone, PartialEq)]
enum Stationary {
    Solved { distribution: Vec<f64>, mean_cost: f64 },
    Singular,
}

/// One action per state, evaluated against a shared [`MdpModel`].
#[derive(Debug, Clone)]
pub struct Policy {
    model: Arc<MdpModel>,
    actions: Vec<usize>,
    transition_matrix: Matrix,
    costs: Vec<f64>,
    stationary: Option<Stationary>,
}

impl Policy {
    /// Creates a policy from an explicit encoding.
    ///
    /// Returns [`Error::InvalidEncoding`] when the encoding length differs
    /// from the state count or an action index is out of range.
    pub fn new(model: Arc<MdpModel>, actions: Vec<usize>) -> Result<Self> {
        let (transition_matrix, costs) = derive(&model, &actions)?;
        Ok(Self {
            model,
            actions,
            transition_matrix,
            costs,
            stationary: None,
        })
    }

    /// Creates a policy with a uniformly random action in each state.
    pub fn random<R: Rng + ?Sized>(model: Arc<MdpModel>, rng: &mut R) -> Result<Self> {
        let count = model.action_count();
        let actions = (0..model.state_count())
            .map(|_| rng.random_range(0..count))
            .collect();
        Self::new(model, actions)
    }

    /// The model this policy is evaluated against.
    pub fn model(&self) -> &Arc<MdpModel> {
        &self.model
    }

    /// Action index chosen in each state.
    pub fn actions(&self) -> &[usize] {
        &self.actions
    }

    /// Induced transition matrix.
    pub fn transition_matrix(&self) -> &[Vec<f64>] {
        &self.transition_matrix
    }

    /// Cost incurred in each state.
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Solves the stationary distribution if needed and returns the
    /// fitness: the mean cost, or `f64::INFINITY` when the induced chain
    /// has no unique stationary distribution.
    ///
    /// Only a singular system is absorbed this way; any other solver error
    /// is returned.
    pub fn evaluate(&mut self) -> Result<f64> {
        if let Some(ref stationary) = self.stationary {
            return Ok(fitness_of(stationary));
        }

        let stationary =
            match stationary_distribution_with(self.model.solver(), &self.transition_matrix) {
                Ok(distribution) => {
                    let mean_cost = mean_cost(&self.costs, &distribution)?;
                    Stationary::Solved {
                        distribution,
                        mean_cost,
                    }
                }
                Err(err) if err.is_recoverable() => {
                    log::trace!("policy {:?} ranked last: {err}", self.actions);
                    Stationary::Singular
                }
                Err(err) => return Err(err),
            };
        let fitness = fitness_of(&stationary);
        self.stationary = Some(stationary);
        Ok(fitness)
    }

    /// Whether the stationary solve has run for the current encoding.
    pub fn is_evaluated(&self) -> bool {
        self.stationary.is_some()
    }

    /// Whether the induced chain was found to have no unique stationary
    /// distribution. `false` until evaluated.
    pub fn is_singular(&self) -> bool {
        matches!(self.stationary, Some(Stationary::Singular))
    }

    /// Stationary distribution, once evaluated and solvable.
    pub fn stationary_distribution(&self) -> Option<&[f64]> {
        match self.stationary {
            Some(Stationary::Solved {
                ref distribution, ..
            }) => Some(distribution.as_slice()),
            _ => None,
        }
    }

    /// Mean cost, once evaluated and solvable.
    pub fn mean_cost(&self) -> Option<f64> {
        match self.stationary {
            Some(Stationary::Solved { mean_cost, .. }) => Some(mean_cost),
            _ => None,
        }
    }

    /// Diagnostic: whether the solved `π` sums to one within `tolerance`.
    pub fn has_normalized_stationary(&self, tolerance: f64) -> Option<bool> {
        self.stationary_distribution()
            .map(|pi| is_normalized(pi, tolerance))
    }

    /// Per-state breakdown for printing, once evaluated and solvable.
    pub fn report(&self) -> Option<PolicyReport> {
        let distribution = self.stationary_distribution()?;
        let states = self
            .actions
            .iter()
            .zip(&self.costs)
            .zip(distribution)
            .enumerate()
            .map(|(state, ((&action, &cost), &probability))| {
                let (name, label) = self
                    .model
                    .action(action)
                    .map(|a| (a.name().to_owned(), a.label().to_owned()))
                    .unwrap_or_default();
                StateReport {
                    state,
                    action,
                    action_name: name,
                    action_label: label,
                    cost,
                    probability,
                }
            })
            .collect();
        Some(PolicyReport {
            encoding: self.actions.clone(),
            states,
            mean_cost: self.mean_cost()?,
            normalized: is_normalized(distribution, NORMALIZATION_TOLERANCE),
        })
    }

    /// Walks the induced chain for `steps` transitions from `start`.
    ///
    /// Returns the visited states, `start` included (`steps + 1` entries).
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        start: usize,
        steps: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        let n = self.transition_matrix.len();
        if start >= n {
            return Err(Error::DimensionMismatch(format!(
                "start state {start} out of range for {n} states"
            )));
        }
        let mut path = Vec::with_capacity(steps + 1);
        let mut state = start;
        path.push(state);
        for _ in 0..steps {
            state = sample_row(&self.transition_matrix[state], rng);
            path.push(state);
        }
        Ok(path)
    }
}

impl Individual for Policy {
    type Encoding = Vec<usize>;

    fn encoding(&self) -> &Vec<usize> {
        &self.actions
    }

    fn set_encoding(&mut self, actions: Vec<usize>) -> Result<()> {
        let (transition_matrix, costs) = derive(&self.model, &actions)?;
        self.actions = actions;
        self.transition_matrix = transition_matrix;
        self.costs = costs;
        self.stationary = None;
        Ok(())
    }

    fn fitness(&self) -> Option<f64> {
        self.stationary.as_ref().map(fitness_of)
    }
}

fn fitness_of(stationary: &Stationary) -> f64 {
    match *stationary {
        Stationary::Solved { mean_cost, .. } => mean_cost,
        Stationary::Singular => f64::INFINITY,
    }
}

/// Induced rows and costs; validates the encoding first.
fn derive(model: &MdpModel, actions: &[usize]) -> Result<(Matrix, Vec<f64>)> {
    validate_encoding(actions, model.state_count(), model.action_count())?;
    let transition_matrix = infer_transition_matrix(actions, model.actions())?;
    let costs = infer_costs(actions, model.costs())?;
    Ok((transition_matrix, costs))
}

/// Evaluated policy, state by state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyReport {
    pub encoding: Vec<usize>,
    pub states: Vec<StateReport>,
    pub mean_cost: f64,
    /// Whether `π` sums to one within [`NORMALIZATION_TOLERANCE`].
    pub normalized: bool,
}

/// One state of a [`PolicyReport`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateReport {
    pub state: usize,
    pub action: usize,
    pub action_name: String,
    pub action_label: String,
    pub cost: f64,
    /// Long-run fraction of time spent in this state.
    pub probability: f64,
}
