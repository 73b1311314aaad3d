/// Stores the numbers the planner updates on every pass through an action.
/// The value is kept as an incremental running mean rather than a sum, so that
/// back-propagated corrections can move it in either direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionStats {
    visits: u32,
    mean: f64,
}

impl ActionStats {
    pub fn new() -> Self {
        ActionStats {
            visits: 0,
            mean: 0.0,
        }
    }

    /// Retrieve the amount of visits to this action
    pub fn visits(&self) -> u32 {
        self.visits
    }

    /// Retrieve the running mean value of this action
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Record one more sample of the action's value.
    /// Increments the visits and folds the sample into the running mean.
    pub fn record(&mut self, sample: f64) {
        self.visits += 1;
        self.mean += (sample - self.mean) / self.visits as f64;
    }

    /// Helper function just to check if the action has been visited or not
    pub fn is_unvisited(&self) -> bool {
        self.visits == 0
    }
}
