use rand::Rng;

use crate::tree::ids::{ActionId, ObservationId, StateId};

/// Generative interface every POMDP used by the planners must provide.
///
/// Sampling methods take the caller's random source so that a planner can keep
/// one deterministic stream for everything it draws.
pub trait GenerativeModel {
    /// Return the number of states `S`.
    fn state_count(&self) -> usize;

    /// Return the number of actions `A`.
    fn action_count(&self) -> usize;

    /// Return the number of observations `O`.
    fn observation_count(&self) -> usize;

    /// Return the discount applied to future value.
    fn discount(&self) -> f64;

    /// Sample one `(next_state, observation, reward)` step.
    /// Repeated calls with the same inputs must be i.i.d. draws from the model.
    fn sample_transition<R: Rng + ?Sized>(
        &self,
        state: StateId,
        action: ActionId,
        rng: &mut R,
    ) -> (StateId, ObservationId, f64);

    /// Sample only the `(observation, reward)` part for an externally produced transition.
    fn sample_observation<R: Rng + ?Sized>(
        &self,
        state: StateId,
        action: ActionId,
        next_state: StateId,
        rng: &mut R,
    ) -> (ObservationId, f64);

    /// Return whether a state is terminal.
    fn is_terminal(&self, state: StateId) -> bool;
}

/// Exact probabilities, needed by planners that track dense beliefs.
pub trait ExactModel: GenerativeModel {
    /// `P(next_state | state, action)`
    fn transition_probability(&self, state: StateId, action: ActionId, next_state: StateId) -> f64;

    /// `P(observation | next_state, action)`
    fn observation_probability(
        &self,
        next_state: StateId,
        action: ActionId,
        observation: ObservationId,
    ) -> f64;

    /// Expected reward of the transition `(state, action, next_state)`.
    fn expected_reward(&self, state: StateId, action: ActionId, next_state: StateId) -> f64;
}
