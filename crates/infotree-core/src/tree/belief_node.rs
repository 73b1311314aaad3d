use crate::tree::{
    action_node::ActionNode,
    histogram::{KnowledgeMode, ParticleHistogram},
    ids::{ActionId, StateId},
};

#[derive(Debug, Clone)]
/// represents a belief reached in the search tree, approximated by particles.
///
/// The knowledge measure of the particles doubles as the node's immediate reward.
/// `value` blends it with the discounted value of the actions below, and is what
/// the node reports upwards during back-propagation.
pub struct BeliefNode {
    visits: u32,
    histogram: ParticleHistogram,
    knowledge: f64,
    best_action: ActionId,
    actions_value: f64,
    value: f64,
    maximizing: bool,
    children: Vec<ActionNode>,
}

impl BeliefNode {
    /// Create a new unexpanded belief node without particles.
    pub fn new(mode: KnowledgeMode) -> Self {
        BeliefNode {
            visits: 0,
            histogram: ParticleHistogram::new(mode),
            knowledge: 0.0,
            best_action: ActionId::from(0),
            actions_value: 0.0,
            value: 0.0,
            maximizing: false,
            children: Vec::new(),
        }
    }

    /// Add a particle for `state` and refresh the cached knowledge measure.
    pub fn update_knowledge(&mut self, state: StateId) {
        self.knowledge = self.histogram.update(state);
    }

    /// Return the cached knowledge measure.
    pub fn knowledge(&self) -> f64 {
        self.knowledge
    }

    /// Expand this node by creating an action node per model action.
    /// Does nothing if the node is already expanded.
    pub fn expand(&mut self, action_count: usize) {
        if self.children.is_empty() {
            self.children = (0..action_count).map(|_| ActionNode::new()).collect();
        }
    }

    /// Helper to be called to see if a node is expanded
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Select an action by UCB1 using this node's visit count.
    /// Returns `None` when the node has not been expanded.
    pub fn select_action(&self, exploration: f64) -> Option<ActionId> {
        if self.children.is_empty() {
            return None;
        }

        // The +1 keeps the bonus defined on the very first visit.
        let log_visits = f64::ln(self.visits as f64 + 1.0);

        let mut best_idx: usize = 0;
        let mut best_score: f64 = f64::NEG_INFINITY;
        for (i, action) in self.children.iter().enumerate() {
            let score = action.ucb_score(log_visits, exploration);
            if score > best_score {
                best_score = score;
                best_idx = i;
            }
        }

        Some(ActionId::from(best_idx))
    }

    /// Pick the action with the highest mean value, the earliest one on ties.
    pub fn best_action_by_value(&self) -> Option<ActionId> {
        let mut best: Option<(usize, f64)> = None;
        for (i, action) in self.children.iter().enumerate() {
            match best {
                Some((_, best_value)) if best_value >= action.value() => {}
                _ => best = Some((i, action.value())),
            }
        }
        best.map(|(i, _)| ActionId::from(i))
    }

    /// Fold a fresh return into the node's action value.
    ///
    /// Until the node has `max_switch_visits` visits it reports the mean of all
    /// returns. From then on it reports the value of its best action.
    pub(crate) fn blend_action_value(
        &mut self,
        action: ActionId,
        sample: f64,
        max_switch_visits: u32,
    ) {
        if self.visits < max_switch_visits {
            self.actions_value += (sample - self.actions_value) / self.visits as f64;
            return;
        }

        if !self.maximizing {
            self.maximizing = true;
            self.actions_value = f64::INFINITY;
            self.best_action = action;
        }
        self.track_best_action(action);
    }

    /// Keep `actions_value` equal to the best action's value after `action` changed.
    fn track_best_action(&mut self, action: ActionId) {
        let Some(action_value) = self.children.get(action.index()).map(ActionNode::value) else {
            return;
        };

        if action_value >= self.actions_value {
            self.actions_value = action_value;
            self.best_action = action;
        } else if action == self.best_action {
            // The incumbent dropped, someone else may be better now.
            if let Some(best) = self.best_action_by_value() {
                self.actions_value = self.children[best.index()].value();
                self.best_action = best;
            }
        }
    }

    /// Recompute the blended value and return the correction the parent should
    /// record, as if this value had been reported on every past visit.
    pub(crate) fn backup(&mut self, discount: f64) -> f64 {
        let old_value = self.value;
        self.value = discount * self.actions_value + self.knowledge;
        (self.visits as f64 - 1.0) * (self.value - old_value) + self.value
    }

    /// Count a visit that stops at this node.
    /// Expanded nodes keep their blended value in sync with the knowledge measure.
    pub(crate) fn record_leaf_visit(&mut self, discount: f64) {
        self.visits += 1;
        if self.is_expanded() {
            self.value = discount * self.actions_value + self.knowledge;
        }
    }

    pub(crate) fn record_visit(&mut self) {
        self.visits += 1;
    }

    /// Counter for number of times we went through this belief node.
    pub fn visits(&self) -> u32 {
        self.visits
    }

    /// Estimated value for this belief, taking future actions into account.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Estimated value of the actions below (mean or max, see `blend_action_value`).
    pub fn actions_value(&self) -> f64 {
        self.actions_value
    }

    /// Action currently tracked as best once the node reports the max.
    pub fn best_action(&self) -> ActionId {
        self.best_action
    }

    /// Whether the node already switched to reporting its best action.
    pub fn is_maximizing(&self) -> bool {
        self.maximizing
    }

    pub fn histogram(&self) -> &ParticleHistogram {
        &self.histogram
    }

    /// Move the particle histogram out, leaving an empty one behind.
    pub(crate) fn take_histogram(&mut self) -> ParticleHistogram {
        let mode = self.histogram.mode();
        std::mem::replace(&mut self.histogram, ParticleHistogram::new(mode))
    }

    /// Using an action id, return the corresponding action node
    pub fn action(&self, action: ActionId) -> Option<&ActionNode> {
        self.children.get(action.index())
    }

    /// Using an action id, return the corresponding action node as mutable
    pub(crate) fn action_mut(&mut self, action: ActionId) -> Option<&mut ActionNode> {
        self.children.get_mut(action.index())
    }

    pub fn actions(&self) -> &[ActionNode] {
        &self.children
    }
}
