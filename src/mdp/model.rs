//! The decision-process model shared by every policy of a search.

use crate::error::{Error, Result};
use crate::linalg::{shape, GaussElimination, Matrix};
use crate::markov::MarkovAction;

/// Actions and cost table of a finite MDP.
///
/// `costs[i][a]` is the cost of taking action `a` in state `i`. The model
/// is immutable once built; policies hold it through an `Arc`, so several
/// searches can share one model or run on different models side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct MdpModel {
    actions: Vec<MarkovAction>,
    costs: Matrix,
    solver: GaussElimination,
}

impl MdpModel {
    /// Builds a model, checking that actions and costs agree.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] when there are no actions.
    /// - [`Error::DimensionMismatch`] when actions cover different state
    ///   counts or the cost table is not `states × actions`.
    /// - [`Error::Configuration`] when a cost is negative or not finite.
    pub fn new(actions: Vec<MarkovAction>, costs: Matrix) -> Result<Self> {
        let first = actions
            .first()
            .ok_or_else(|| Error::Configuration("a model needs at least one action".into()))?;
        let states = first.state_count();
        if let Some(other) = actions.iter().find(|a| a.state_count() != states) {
            return Err(Error::DimensionMismatch(format!(
                "action `{}` covers {} states, action `{}` covers {states}",
                other.name(),
                other.state_count(),
                first.name()
            )));
        }

        let (rows, cols) = shape(&costs)?;
        if rows != states || cols != actions.len() {
            return Err(Error::DimensionMismatch(format!(
                "cost table is {rows}x{cols}, expected {states}x{}",
                actions.len()
            )));
        }
        for (i, row) in costs.iter().enumerate() {
            for (a, &c) in row.iter().enumerate() {
                if !c.is_finite() || c < 0.0 {
                    return Err(Error::Configuration(format!(
                        "cost of action {a} in state {i} is {c}; costs must be finite and non-negative"
                    )));
                }
            }
        }

        Ok(Self {
            actions,
            costs,
            solver: GaussElimination::default(),
        })
    }

    /// Replaces the pivot tolerance used by stationary-distribution solves.
    pub fn with_pivot_tolerance(mut self, pivot_tolerance: f64) -> Self {
        self.solver = GaussElimination::with_pivot_tolerance(pivot_tolerance);
        self
    }

    /// Number of states.
    pub fn state_count(&self) -> usize {
        self.costs.len()
    }

    /// Number of actions.
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// The actions, indexed by action id.
    pub fn actions(&self) -> &[MarkovAction] {
        &self.actions
    }

    /// Action `index`, if it exists.
    pub fn action(&self, index: usize) -> Option<&MarkovAction> {
        self.actions.get(index)
    }

    /// The `states × actions` cost table.
    pub fn costs(&self) -> &[Vec<f64>] {
        &self.costs
    }

    /// The solver used for stationary distributions.
    pub fn solver(&self) -> &GaussElimination {
        &self.solver
    }
}
