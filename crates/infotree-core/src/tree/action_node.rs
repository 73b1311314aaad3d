use std::collections::HashMap;

use crate::tree::{
    belief_node::BeliefNode,
    ids::ObservationId,
    stats::ActionStats,
};

#[derive(Debug, Clone, Default)]
/// represents "taking a particular action from this belief."
/// Holds the stats of the action and the beliefs reached through each observation.
pub struct ActionNode {
    stats: ActionStats,
    children: HashMap<ObservationId, BeliefNode>,
}

impl ActionNode {
    /// Create a new action node
    pub fn new() -> Self {
        ActionNode {
            stats: ActionStats::new(),
            children: HashMap::new(),
        }
    }

    /// Fold one more value sample into the running mean.
    pub fn record(&mut self, sample: f64) {
        self.stats.record(sample);
    }

    /// Calculate the UCB1 score of this action given the parent's visit count.
    /// Unvisited actions always score infinity so they are tried first.
    pub fn ucb_score(&self, log_parent_visits: f64, exploration: f64) -> f64 {
        if self.stats.is_unvisited() {
            f64::INFINITY
        } else {
            self.stats.mean()
                + exploration * f64::sqrt(log_parent_visits / self.stats.visits() as f64)
        }
    }

    /// Return the amount of times this action has been taken
    pub fn visits(&self) -> u32 {
        self.stats.visits()
    }

    /// Return the running mean value of this action.
    pub fn value(&self) -> f64 {
        self.stats.mean()
    }

    /// Find the belief reached through this observation, if any.
    pub fn child(&self, observation: ObservationId) -> Option<&BeliefNode> {
        self.children.get(&observation)
    }

    /// Return the belief reached through this observation, and whether it had to be created.
    pub(crate) fn child_or_insert(
        &mut self,
        observation: ObservationId,
        create: impl FnOnce() -> BeliefNode,
    ) -> (&mut BeliefNode, bool) {
        let mut created = false;
        let child = self.children.entry(observation).or_insert_with(|| {
            created = true;
            create()
        });
        (child, created)
    }

    /// Remove the belief for this observation and hand over ownership.
    pub(crate) fn detach(&mut self, observation: ObservationId) -> Option<BeliefNode> {
        self.children.remove(&observation)
    }

    /// Return the amount of distinct observations seen under this action.
    pub fn children_len(&self) -> usize {
        self.children.len()
    }

    /// Iterate over the observed beliefs, in no particular order.
    pub fn children(&self) -> impl Iterator<Item = (ObservationId, &BeliefNode)> {
        self.children.iter().map(|(observation, node)| (*observation, node))
    }
}
