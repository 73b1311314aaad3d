#![allow(dead_code)]

use infotree_core::{ActionId, ExactModel, GenerativeModel, ObservationId, StateId};
use rand::Rng;

/// Two states that swap every step, observed through a noisy sensor.
#[derive(Debug, Clone)]
pub struct FlipModel {
    pub accuracy: f64,
    pub discount: f64,
}

impl FlipModel {
    pub fn new(accuracy: f64, discount: f64) -> Self {
        FlipModel { accuracy, discount }
    }

    fn flip(state: StateId) -> StateId {
        StateId::from(1 - state.index())
    }
}

impl GenerativeModel for FlipModel {
    fn state_count(&self) -> usize {
        2
    }

    fn action_count(&self) -> usize {
        1
    }

    fn observation_count(&self) -> usize {
        2
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
        let next_state = Self::flip(state);
        let (observation, reward) = self.sample_observation(state, action, next_state, rng);
        (next_state, observation, reward)
    }

    fn sample_observation<R: Rng + ?Sized>(
        &self,
        _state: StateId,
        _action: ActionId,
        next_state: StateId,
        rng: &mut R,
    ) -> (ObservationId, f64) {
        let correct: bool = rng.r#gen::<f64>() < self.accuracy;
        let seen = if correct {
            next_state
        } else {
            Self::flip(next_state)
        };
        (ObservationId::from(seen.index()), 0.0)
    }

    fn is_terminal(&self, _state: StateId) -> bool {
        false
    }
}

impl ExactModel for FlipModel {
    fn transition_probability(&self, state: StateId, _action: ActionId, next_state: StateId) -> f64 {
        if next_state == Self::flip(state) { 1.0 } else { 0.0 }
    }

    fn observation_probability(
        &self,
        next_state: StateId,
        _action: ActionId,
        observation: ObservationId,
    ) -> f64 {
        if observation.index() == next_state.index() {
            self.accuracy
        } else {
            1.0 - self.accuracy
        }
    }

    fn expected_reward(&self, _state: StateId, _action: ActionId, _next_state: StateId) -> f64 {
        0.0
    }
}

/// Two static states. Informative actions read a noisy sensor and cost
/// `look_cost`, the others always observe 0. Observation 2 is never emitted.
#[derive(Debug, Clone)]
pub struct SensorModel {
    pub informative: Vec<bool>,
    pub accuracy: f64,
    pub look_cost: f64,
    pub discount: f64,
}

impl SensorModel {
    /// Action 0 looks, action 1 idles.
    pub fn look_or_idle() -> Self {
        SensorModel {
            informative: vec![true, false],
            accuracy: 0.9,
            look_cost: 0.1,
            discount: 0.95,
        }
    }

    fn is_informative(&self, action: ActionId) -> bool {
        self.informative.get(action.index()).copied().unwrap_or(false)
    }
}

impl GenerativeModel for SensorModel {
    fn state_count(&self) -> usize {
        2
    }

    fn action_count(&self) -> usize {
        self.informative.len()
    }

    fn observation_count(&self) -> usize {
        3
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
        let (observation, reward) = self.sample_observation(state, action, state, rng);
        (state, observation, reward)
    }

    fn sample_observation<R: Rng + ?Sized>(
        &self,
        _state: StateId,
        action: ActionId,
        next_state: StateId,
        rng: &mut R,
    ) -> (ObservationId, f64) {
        if !self.is_informative(action) {
            return (ObservationId::from(0), 0.0);
        }
        let correct: bool = rng.r#gen::<f64>() < self.accuracy;
        let seen = if correct {
            next_state.index()
        } else {
            1 - next_state.index()
        };
        (ObservationId::from(seen), -self.look_cost)
    }

    fn is_terminal(&self, _state: StateId) -> bool {
        false
    }
}

impl ExactModel for SensorModel {
    fn transition_probability(&self, state: StateId, _action: ActionId, next_state: StateId) -> f64 {
        if state == next_state { 1.0 } else { 0.0 }
    }

    fn observation_probability(
        &self,
        next_state: StateId,
        action: ActionId,
        observation: ObservationId,
    ) -> f64 {
        if !self.is_informative(action) {
            return if observation.index() == 0 { 1.0 } else { 0.0 };
        }
        if observation.index() == next_state.index() {
            self.accuracy
        } else if observation.index() == 1 - next_state.index() {
            1.0 - self.accuracy
        } else {
            0.0
        }
    }

    fn expected_reward(&self, _state: StateId, action: ActionId, _next_state: StateId) -> f64 {
        if self.is_informative(action) {
            -self.look_cost
        } else {
            0.0
        }
    }
}
