use serde::{Deserialize, Serialize};

/// A wrapper for an integer index naming one state of the model.
/// States are opaque to the planner, domains encode their structure any way they like.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(usize);

impl StateId {
    /// Get the raw index of the state.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for StateId {
    /// Allow for explicit conversion from usize to StateId
    fn from(value: usize) -> Self {
        StateId(value)
    }
}

/// A wrapper for an integer index used to determine the node's action list
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(usize);

impl ActionId {
    /// Get the value of the actual action without having to access and risk overiding the internal value
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ActionId {
    /// Allow for explicit conversion from usize to ActionId
    fn from(value: usize) -> Self {
        ActionId(value)
    }
}

/// A wrapper for an integer index naming one observation of the model.
/// Observations key the belief children of an action node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObservationId(usize);

impl ObservationId {
    /// Get the raw index of the observation.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ObservationId {
    /// Allow for explicit conversion from usize to ObservationId
    fn from(value: usize) -> Self {
        ObservationId(value)
    }
}
