use std::collections::HashMap;

use infotree_core::{ActionId, ExactModel, GenerativeModel, ObservationId, StateId};
use log::debug;
use rand::Rng;

use crate::{
    PomdpError, PomdpSpec,
    spec::{index_ids, lookup},
};

/// Floating point tolerance used when validating probability sums.
pub(crate) const PROB_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone)]
/// Runtime form of a POMDP with resolved ids, dense probability tables and
/// precomputed CDFs for sampling.
///
/// Indices handed to the sampling methods are expected to be in range. Out of
/// range inputs are treated as a zero-reward self-loop observing 0.
pub struct CompiledPomdp {
    discount: f64,
    state_ids: Vec<String>,
    action_ids: Vec<String>,
    observation_ids: Vec<String>,
    state_keys: HashMap<String, StateId>,
    action_keys: HashMap<String, ActionId>,
    observation_keys: HashMap<String, ObservationId>,
    terminal: Vec<bool>,
    /// Indexed by `state * A + action`.
    transitions: Vec<Distribution<(StateId, f64)>>,
    /// Indexed by `next_state * A + action`.
    emissions: Vec<Distribution<ObservationId>>,
    /// Indexed by `(state * A + action) * S + next_state`.
    transition_probs: Vec<f64>,
    expected_rewards: Vec<f64>,
    /// Rewards of the outcomes reaching `next_state`, weighted by their probability.
    rewards: Vec<Distribution<f64>>,
    /// Indexed by `(next_state * A + action) * O + observation`.
    observation_probs: Vec<f64>,
}

/// Outcomes with positive probability and their cumulative mass. The total mass
/// may be below 1 when the distribution is a slice of a larger one.
#[derive(Debug, Clone)]
struct Distribution<T> {
    outcomes: Vec<T>,
    cdf: Vec<f64>,
}

impl<T: Copy> Distribution<T> {
    fn new() -> Self {
        Distribution {
            outcomes: Vec::new(),
            cdf: Vec::new(),
        }
    }

    fn push(&mut self, outcome: T, prob: f64) {
        if prob <= 0.0 {
            return;
        }
        let cumulative = self.cdf.last().copied().unwrap_or(0.0) + prob;
        self.outcomes.push(outcome);
        self.cdf.push(cumulative);
    }

    /// Pick an outcome with a uniform sample in `[0, 1)`.
    fn sample(&self, sample: f64) -> Option<T> {
        let last = self.outcomes.len().checked_sub(1)?;
        let target = sample * self.cdf.last()?;
        let chosen = self.cdf.partition_point(|p| *p <= target).min(last);
        self.outcomes.get(chosen).copied()
    }
}

impl CompiledPomdp {
    /// Compile and validate a spec into a fast runtime representation.
    pub(crate) fn from_spec(spec: &PomdpSpec) -> Result<Self, PomdpError> {
        spec.validate_with_tolerance(PROB_TOLERANCE)?;

        let state_index = index_ids("state", spec.states.iter().map(|s| s.id.as_str()))?;
        let action_index = index_ids("action", spec.actions.iter().map(String::as_str))?;
        let observation_index =
            index_ids("observation", spec.observations.iter().map(String::as_str))?;

        let state_count = spec.states.len();
        let action_count = spec.actions.len();
        let observation_count = spec.observations.len();
        let pairs = state_count * action_count;

        let terminal: Vec<bool> = spec
            .states
            .iter()
            .map(|s| s.terminal.unwrap_or(false))
            .collect();

        let mut transitions = vec![Distribution::new(); pairs];
        let mut transition_probs = vec![0.0; pairs * state_count];
        let mut weighted_rewards = vec![0.0; pairs * state_count];
        let mut rewards = vec![Distribution::new(); pairs * state_count];

        for (s, is_terminal) in terminal.iter().enumerate() {
            if !*is_terminal {
                continue;
            }
            for a in 0..action_count {
                let pair = s * action_count + a;
                transitions[pair].push((StateId::from(s), 0.0), 1.0);
                transition_probs[pair * state_count + s] = 1.0;
                rewards[pair * state_count + s].push(0.0, 1.0);
            }
        }

        for transition in &spec.transitions {
            let s = lookup(&state_index, "state", &transition.state)?;
            let a = lookup(&action_index, "action", &transition.action)?;
            let pair = s * action_count + a;

            for outcome in &transition.outcomes {
                let next = lookup(&state_index, "state", &outcome.next)?;
                transitions[pair].push((StateId::from(next), outcome.reward), outcome.prob);
                transition_probs[pair * state_count + next] += outcome.prob;
                weighted_rewards[pair * state_count + next] += outcome.prob * outcome.reward;
                rewards[pair * state_count + next].push(outcome.reward, outcome.prob);
            }
        }

        let expected_rewards = transition_probs
            .iter()
            .zip(&weighted_rewards)
            .map(|(prob, weighted)| if *prob > 0.0 { weighted / prob } else { 0.0 })
            .collect();

        // Action specific emissions override the shared one for their state.
        let mut shared = HashMap::new();
        let mut specific = HashMap::new();
        for emission in &spec.emissions {
            let next = lookup(&state_index, "state", &emission.next)?;
            match &emission.action {
                Some(action) => {
                    let a = lookup(&action_index, "action", action)?;
                    specific.insert((next, a), emission);
                }
                None => {
                    shared.insert(next, emission);
                }
            }
        }

        let mut emissions = Vec::with_capacity(pairs);
        let mut observation_probs = vec![0.0; pairs * observation_count];
        for next in 0..state_count {
            for a in 0..action_count {
                let pair = next * action_count + a;
                let emission = specific
                    .get(&(next, a))
                    .or_else(|| shared.get(&next))
                    .ok_or_else(|| PomdpError::MissingEmission {
                        next: spec.states[next].id.clone(),
                        action: spec.actions[a].clone(),
                    })?;

                let mut distribution = Distribution::new();
                for outcome in &emission.outcomes {
                    let o = lookup(&observation_index, "observation", &outcome.observation)?;
                    distribution.push(ObservationId::from(o), outcome.prob);
                    observation_probs[pair * observation_count + o] += outcome.prob;
                }
                emissions.push(distribution);
            }
        }

        debug!(
            "compiled POMDP with {state_count} states, {action_count} actions, {observation_count} observations"
        );

        let state_ids: Vec<String> = spec.states.iter().map(|s| s.id.clone()).collect();
        Ok(CompiledPomdp {
            discount: spec.discount,
            state_keys: keys(&state_ids),
            state_ids,
            action_ids: spec.actions.clone(),
            observation_ids: spec.observations.clone(),
            action_keys: keys(&spec.actions),
            observation_keys: keys(&spec.observations),
            terminal,
            transitions,
            emissions,
            transition_probs,
            expected_rewards,
            rewards,
            observation_probs,
        })
    }

    /// Convert a state key back to its original string id.
    pub fn state_id(&self, key: StateId) -> Option<&str> {
        self.state_ids.get(key.index()).map(String::as_str)
    }

    /// Convert a string id into a compiled state key.
    pub fn state_key(&self, id: &str) -> Option<StateId> {
        self.state_keys.get(id).copied()
    }

    pub fn action_id(&self, key: ActionId) -> Option<&str> {
        self.action_ids.get(key.index()).map(String::as_str)
    }

    pub fn action_key(&self, id: &str) -> Option<ActionId> {
        self.action_keys.get(id).copied()
    }

    pub fn observation_id(&self, key: ObservationId) -> Option<&str> {
        self.observation_ids.get(key.index()).map(String::as_str)
    }

    pub fn observation_key(&self, id: &str) -> Option<ObservationId> {
        self.observation_keys.get(id).copied()
    }

    fn pair(&self, state: usize, action: ActionId) -> Option<usize> {
        let action_count = self.action_ids.len();
        if state >= self.state_ids.len() || action.index() >= action_count {
            return None;
        }
        Some(state * action_count + action.index())
    }

    fn sample_emission<R: Rng + ?Sized>(
        &self,
        next_state: StateId,
        action: ActionId,
        rng: &mut R,
    ) -> ObservationId {
        let sample: f64 = rng.r#gen();
        self.pair(next_state.index(), action)
            .and_then(|pair| self.emissions.get(pair))
            .and_then(|distribution| distribution.sample(sample))
            .unwrap_or(ObservationId::from(0))
    }
}

fn keys<K: From<usize>>(ids: &[String]) -> HashMap<String, K> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), K::from(i)))
        .collect()
}

impl GenerativeModel for CompiledPomdp {
    fn state_count(&self) -> usize {
        self.state_ids.len()
    }

    fn action_count(&self) -> usize {
        self.action_ids.len()
    }

    fn observation_count(&self) -> usize {
        self.observation_ids.len()
    }

    fn discount(&self) -> f64 {
        self.discount
    }

    fn sample_transition<R: Rng + ?Sized>(
        &self,
        state: StateId,
        action: ActionId,
        rng: &mut R,
    ) -> (StateId, ObservationId, f64) {
        let sample: f64 = rng.r#gen();
        let outcome = self
            .pair(state.index(), action)
            .and_then(|pair| self.transitions.get(pair))
            .and_then(|distribution| distribution.sample(sample));

        let Some((next_state, reward)) = outcome else {
            return (state, ObservationId::from(0), 0.0);
        };
        let observation = self.sample_emission(next_state, action, rng);
        (next_state, observation, reward)
    }

    fn sample_observation<R: Rng + ?Sized>(
        &self,
        state: StateId,
        action: ActionId,
        next_state: StateId,
        rng: &mut R,
    ) -> (ObservationId, f64) {
        let observation = self.sample_emission(next_state, action, rng);
        let sample: f64 = rng.r#gen();
        let state_count = self.state_ids.len();
        let reward = self
            .pair(state.index(), action)
            .filter(|_| next_state.index() < state_count)
            .and_then(|pair| self.rewards.get(pair * state_count + next_state.index()))
            .and_then(|distribution| distribution.sample(sample))
            .unwrap_or(0.0);
        (observation, reward)
    }

    fn is_terminal(&self, state: StateId) -> bool {
        self.terminal.get(state.index()).copied().unwrap_or(false)
    }
}

impl ExactModel for CompiledPomdp {
    fn transition_probability(&self, state: StateId, action: ActionId, next_state: StateId) -> f64 {
        let state_count = self.state_ids.len();
        if next_state.index() >= state_count {
            return 0.0;
        }
        self.pair(state.index(), action)
            .and_then(|pair| self.transition_probs.get(pair * state_count + next_state.index()))
            .copied()
            .unwrap_or(0.0)
    }

    fn observation_probability(
        &self,
        next_state: StateId,
        action: ActionId,
        observation: ObservationId,
    ) -> f64 {
        let observation_count = self.observation_ids.len();
        if observation.index() >= observation_count {
            return 0.0;
        }
        self.pair(next_state.index(), action)
            .and_then(|pair| {
                self.observation_probs
                    .get(pair * observation_count + observation.index())
            })
            .copied()
            .unwrap_or(0.0)
    }

    fn expected_reward(&self, state: StateId, action: ActionId, next_state: StateId) -> f64 {
        let state_count = self.state_ids.len();
        if next_state.index() >= state_count {
            return 0.0;
        }
        self.pair(state.index(), action)
            .and_then(|pair| self.expected_rewards.get(pair * state_count + next_state.index()))
            .copied()
            .unwrap_or(0.0)
    }
}
