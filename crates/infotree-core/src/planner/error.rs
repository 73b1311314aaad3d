use std::fmt;

use crate::tree::ids::ActionId;

/// Error type for planning calls that received inputs the model cannot accept.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerError {
    /// The belief does not have one entry per model state.
    BeliefSizeMismatch { expected: usize, actual: usize },
    /// The belief is not a probability distribution.
    InvalidBelief { reason: String },
    /// The action taken in the last step is not an action of the model.
    ActionOutOfRange {
        action_id: ActionId,
        action_count: usize,
    },
    /// The root ended up without particles to simulate from.
    NoParticles,
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::BeliefSizeMismatch { expected, actual } => write!(
                f,
                "belief has {actual} entries but the model has {expected} states"
            ),
            PlannerError::InvalidBelief { reason } => write!(f, "invalid belief: {reason}"),
            PlannerError::ActionOutOfRange {
                action_id,
                action_count,
            } => write!(
                f,
                "action {} is out of range for a model with {} actions",
                action_id.index(),
                action_count
            ),
            PlannerError::NoParticles => write!(f, "root belief holds no particles"),
        }
    }
}

impl std::error::Error for PlannerError {}
