//! GA adapter for policy search.
//!
//! Bridges [`MdpModel`] into the generic GA framework: [`PolicySearch`]
//! implements [`GaProblem`] with [`Policy`] individuals, and
//! [`PolicySearch::runner`] wires the strategies the search uses (elitism,
//! single-point crossover, resample mutation over the action set).

use std::sync::Arc;

use rand::Rng;

use super::model::MdpModel;
use super::policy::Policy;
use crate::error::{Error, Result};
use crate::ga::{
    Elitism, FitnessDirection, GaConfig, GaProblem, GaResult, GaRunner, ResampleMutation,
    SinglePointCrossover,
};

/// Searches for the policy with the lowest long-run mean cost.
#[derive(Debug, Clone)]
pub struct PolicySearch {
    model: Arc<MdpModel>,
    target_cost: Option<f64>,
}

impl PolicySearch {
    /// Creates a search over `model`.
    pub fn new(model: Arc<MdpModel>) -> Self {
        Self {
            model,
            target_cost: None,
        }
    }

    /// Stops the search as soon as a policy costs at most `cost`.
    pub fn with_target_cost(mut self, cost: f64) -> Self {
        self.target_cost = Some(cost);
        self
    }

    /// The model being searched.
    pub fn model(&self) -> &Arc<MdpModel> {
        &self.model
    }

    /// Builds the runner for this search.
    ///
    /// Costs are minimized, so `config.direction` must be
    /// [`FitnessDirection::Ascending`]; anything else is a
    /// [`Error::Configuration`].
    pub fn runner(
        &self,
        config: GaConfig,
    ) -> Result<GaRunner<Elitism, SinglePointCrossover, ResampleMutation>> {
        if config.direction != FitnessDirection::Ascending {
            return Err(Error::Configuration(format!(
                "policy search minimizes mean cost and needs FitnessDirection::Ascending, got {:?}",
                config.direction
            )));
        }
        GaRunner::new(
            config,
            Elitism::new(FitnessDirection::Ascending),
            SinglePointCrossover,
            ResampleMutation::new(self.model.action_count())?,
        )
    }

    /// Runs the search and returns the cheapest policy found.
    pub fn run(&self, config: GaConfig) -> Result<GaResult<Policy>> {
        self.runner(config)?.run(self)
    }

    /// Evaluates hand-written policies and returns the cheapest one.
    ///
    /// Singular policies are skipped; `Ok(None)` means no candidate had a
    /// unique stationary distribution. Ties keep the earliest candidate.
    pub fn cheapest<I>(&self, encodings: I) -> Result<Option<Policy>>
    where
        I: IntoIterator<Item = Vec<usize>>,
    {
        let mut best: Option<Policy> = None;
        for encoding in encodings {
            let mut policy = Policy::new(self.model.clone(), encoding)?;
            policy.evaluate()?;
            let Some(cost) = policy.mean_cost() else {
                continue;
            };
            if best.as_ref().and_then(Policy::mean_cost).map_or(true, |b| cost < b) {
                best = Some(policy);
            }
        }
        Ok(best)
    }
}

impl GaProblem for PolicySearch {
    type Individual = Policy;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Result<Policy> {
        Policy::random(self.model.clone(), rng)
    }

    fn evaluate(&self, policy: &mut Policy) -> Result<f64> {
        policy.evaluate()
    }

    fn solution_is_found(&self, policy: &Policy) -> bool {
        matches!((self.target_cost, policy.mean_cost()), (Some(target), Some(cost)) if cost <= target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{Individual, StopReason};
    use crate::markov::MarkovAction;

    /// Three states; `push` moves right, `reset` jumps to 0.
    fn ladder() -> Arc<MdpModel> {
        let push = MarkovAction::new(
            "push",
            "Push",
            vec![
                vec![0.2, 0.8, 0.0],
                vec![0.0, 0.2, 0.8],
                vec![0.0, 0.0, 1.0],
            ],
        )
        .unwrap();
        let reset = MarkovAction::new(
            "reset",
            "Reset",
            vec![
                vec![1.0, 0.0, 0.0],
                vec![1.0, 0.0, 0.0],
                vec![1.0, 0.0, 0.0],
            ],
        )
        .unwrap();
        let costs = vec![vec![5.0, 9.0], vec![3.0, 9.0], vec![1.0, 9.0]];
        Arc::new(MdpModel::new(vec![push, reset], costs).unwrap())
    }

    #[test]
    fn test_rejects_descending_direction() {
        let search = PolicySearch::new(ladder());
        let result = search.run(GaConfig::new(FitnessDirection::Descending));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_finds_absorbing_cheap_state() {
        let search = PolicySearch::new(ladder());
        let config = GaConfig::new(FitnessDirection::Ascending)
            .with_population_size(20)
            .with_max_iterations(50)
            .with_plateau_tolerance(0.0)
            .with_seed(42);
        let result = search.run(config).unwrap();
        // Pushing everywhere ends in state 2 forever: mean cost 1.
        assert_eq!(result.best.actions()[1..], [0, 0]);
        assert!((result.best_fitness - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cheapest_picks_lowest_mean_cost() {
        let search = PolicySearch::new(ladder());
        // [1, 0, 0] has two absorbing states and is skipped.
        let best = search
            .cheapest(vec![vec![1, 1, 1], vec![1, 0, 0], vec![0, 0, 0]])
            .unwrap()
            .unwrap();
        assert_eq!(best.actions(), &[0, 0, 0][..]);
        assert_eq!(best.fitness(), best.mean_cost());
        assert!((best.mean_cost().unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cheapest_with_only_singular_candidates() {
        let model = Arc::new(
            MdpModel::new(
                vec![MarkovAction::new("stay", "Stay", vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap()],
                vec![vec![1.0], vec![2.0]],
            )
            .unwrap(),
        );
        let search = PolicySearch::new(model);
        assert!(search.cheapest(vec![vec![0, 0]]).unwrap().is_none());
        assert!(search.cheapest(vec![vec![0, 0, 0]]).is_err());
    }

    #[test]
    fn test_target_cost_stops_early() {
        let search = PolicySearch::new(ladder()).with_target_cost(1.0 + 1e-9);
        let config = GaConfig::new(FitnessDirection::Ascending)
            .with_population_size(20)
            .with_max_iterations(200)
            .with_plateau_tolerance(0.0)
            .with_seed(7);
        let result = search.run(config).unwrap();
        assert_eq!(result.stop_reason, StopReason::SolutionFound);
    }
}
