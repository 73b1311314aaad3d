use infotree_core::{
    ActionId, GenerativeModel, ObservationId, StateId,
    probability::{sample_probability, validate_belief},
};
use log::trace;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{CompiledPomdp, PomdpError};

#[derive(Debug, Clone)]
/// Seeded world simulator over a compiled POMDP.
///
/// Holds the hidden state; callers only see the observations and rewards
/// returned by [`PomdpSimulator::step`].
pub struct PomdpSimulator {
    pomdp: CompiledPomdp,
    rng: ChaCha8Rng,
    state: StateId,
}

impl PomdpSimulator {
    /// Create a simulator in state 0 with a deterministic RNG seed.
    pub fn new(pomdp: CompiledPomdp, seed: u64) -> Self {
        Self {
            pomdp,
            rng: ChaCha8Rng::seed_from_u64(seed),
            state: StateId::from(0),
        }
    }

    /// Borrow the underlying compiled POMDP.
    pub fn pomdp(&self) -> &CompiledPomdp {
        &self.pomdp
    }

    /// Return the hidden state.
    pub fn state(&self) -> StateId {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.pomdp.is_terminal(self.state)
    }

    /// Draw the hidden state from `belief`.
    pub fn reset(&mut self, belief: &[f64]) -> Result<StateId, PomdpError> {
        validate_belief(belief, self.pomdp.state_count())?;
        self.state = StateId::from(sample_probability(belief, &mut self.rng));
        Ok(self.state)
    }

    /// Put the world in a known state.
    pub fn reset_to(&mut self, state: StateId) -> Result<(), PomdpError> {
        let count = self.pomdp.state_count();
        if state.index() >= count {
            return Err(PomdpError::IndexOutOfRange {
                kind: "state",
                index: state.index(),
                count,
            });
        }
        self.state = state;
        Ok(())
    }

    /// Take `action` in the hidden state and return the `(observation, reward)` received.
    pub fn step(&mut self, action: ActionId) -> Result<(ObservationId, f64), PomdpError> {
        let count = self.pomdp.action_count();
        if action.index() >= count {
            return Err(PomdpError::IndexOutOfRange {
                kind: "action",
                index: action.index(),
                count,
            });
        }

        let (next_state, observation, reward) =
            self.pomdp
                .sample_transition(self.state, action, &mut self.rng);
        trace!(
            "state {} --action {}--> state {} observing {} (reward {reward})",
            self.state.index(),
            action.index(),
            next_state.index(),
            observation.index()
        );
        self.state = next_state;
        Ok((observation, reward))
    }
}
