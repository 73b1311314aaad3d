//! Exhaustive bounded-lookahead planner over exact beliefs.
//!
//! Every action and every observation is expanded up to the horizon, each branch
//! weighted by its exact probability. The only pruning comes from a crude upper
//! bound that assumes the maximum reward is collected at every remaining step.
//! Nothing is kept between calls.

use serde::{Deserialize, Serialize};

use crate::{
    model::ExactModel,
    planner::{config::ConfigError, error::PlannerError, search::validate_model},
    probability::{Belief, condition_on_observation, predict_belief, validate_belief},
    tree::ids::{ActionId, ObservationId, StateId},
};

/// Observations less likely than this are not expanded.
const MIN_OBSERVATION_PROBABILITY: f64 = 1e-12;

/// How a step is rewarded by the lookahead planner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeliefReward {
    /// The largest entry of the posterior belief.
    #[default]
    MaxBelief,
    /// `Σ b ln b` of the posterior belief; never positive.
    NegativeEntropy,
    /// The model's own expected reward for the transition.
    Model,
}

impl BeliefReward {
    fn of_belief(self, belief: &[f64]) -> f64 {
        match self {
            BeliefReward::MaxBelief => belief.iter().copied().fold(0.0, f64::max),
            BeliefReward::NegativeEntropy => belief
                .iter()
                .filter(|p| **p > 0.0)
                .map(|p| p * p.ln())
                .sum(),
            BeliefReward::Model => 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lookahead<'m, M: ExactModel> {
    model: &'m M,
    max_reward: f64,
    reward: BeliefReward,
    last_belief: Belief,
}

impl<'m, M: ExactModel> Lookahead<'m, M> {
    /// Create a planner over `model`.
    ///
    /// `max_reward` must be at least the largest reward obtainable in one step,
    /// it drives the pruning bound.
    pub fn new(
        model: &'m M,
        max_reward: f64,
        reward: BeliefReward,
    ) -> Result<Self, ConfigError> {
        validate_model(model)?;
        if !max_reward.is_finite() {
            return Err(ConfigError::Invalid("max_reward must be finite".to_string()));
        }

        Ok(Lookahead {
            model,
            max_reward,
            reward,
            last_belief: Vec::new(),
        })
    }

    /// Compute the best action for `belief` and its value over `horizon` steps.
    pub fn best_action(
        &mut self,
        belief: &[f64],
        horizon: usize,
    ) -> Result<(ActionId, f64), PlannerError> {
        validate_belief(belief, self.model.state_count())?;
        self.last_belief = belief.to_vec();

        Ok(self.search(belief, horizon))
    }

    /// Return the most likely state of the last planned belief.
    pub fn guess(&self) -> Option<StateId> {
        let mut best: Option<(usize, f64)> = None;
        for (s, p) in self.last_belief.iter().enumerate() {
            match best {
                Some((_, best_p)) if best_p >= *p => {}
                _ => best = Some((s, *p)),
            }
        }
        best.map(|(s, _)| StateId::from(s))
    }

    pub fn model(&self) -> &'m M {
        self.model
    }

    fn search(&self, belief: &[f64], horizon: usize) -> (ActionId, f64) {
        if horizon == 0 {
            return (ActionId::from(0), 0.0);
        }

        let discount = self.model.discount();
        let mut best_action = ActionId::from(0);
        let mut best_value = f64::NEG_INFINITY;

        // Actions are visited in index order; a problem-specific ordering from
        // most to least promising would prune more.
        for a in 0..self.model.action_count() {
            let action = ActionId::from(a);
            let mut value = 0.0;

            if self.upper_bound(horizon) > best_value {
                let predicted = predict_belief(self.model, belief, action);
                if self.reward == BeliefReward::Model {
                    value += self.expected_reward(belief, action);
                }

                for o in 0..self.model.observation_count() {
                    let (probability, posterior) =
                        condition_on_observation(self.model, &predicted, action, ObservationId::from(o));
                    let Some(posterior) = posterior else {
                        continue;
                    };
                    if probability < MIN_OBSERVATION_PROBABILITY {
                        continue;
                    }

                    let (_, future) = self.search(&posterior, horizon - 1);
                    value += discount * probability * future;
                    value += probability * self.reward.of_belief(&posterior);
                }
            }

            if value > best_value {
                best_value = value;
                best_action = action;
            }
        }

        (best_action, best_value)
    }

    /// Overestimate of the value reachable in `horizon` steps: the maximum
    /// reward at every step.
    fn upper_bound(&self, horizon: usize) -> f64 {
        let discount = self.model.discount();
        let mut bound = 0.0;
        let mut weight = 1.0;
        for _ in 0..horizon {
            bound += weight * self.max_reward;
            weight *= discount;
        }
        bound
    }

    fn expected_reward(&self, belief: &[f64], action: ActionId) -> f64 {
        let state_count = self.model.state_count();
        let mut total = 0.0;
        for (s, p) in belief.iter().enumerate() {
            if *p == 0.0 {
                continue;
            }
            let state = StateId::from(s);
            for s1 in 0..state_count {
                let next_state = StateId::from(s1);
                let transition = self.model.transition_probability(state, action, next_state);
                if transition > 0.0 {
                    total += p * transition * self.model.expected_reward(state, action, next_state);
                }
            }
        }
        total
    }
}
