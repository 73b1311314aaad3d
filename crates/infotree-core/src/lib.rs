mod lookahead;
mod model;
mod planner;
pub mod probability;
mod tree;

pub use lookahead::{BeliefReward, Lookahead};
pub use model::{ExactModel, GenerativeModel};
pub use planner::config::{ConfigError, PlannerConfig};
pub use planner::ensemble::combined_best_action;
pub use planner::error::PlannerError;
pub use planner::search::Planner;
pub use probability::Belief;
pub use tree::action_node::ActionNode;
pub use tree::belief_node::BeliefNode;
pub use tree::head::HeadBeliefNode;
pub use tree::histogram::{KnowledgeMode, ParticleHistogram};
pub use tree::ids::{ActionId, ObservationId, StateId};
pub use tree::snapshot::{
    ActionNodeSnapshot, NodeSnapshot, ObservationSnapshot, ParticleSnapshot, TreeSnapshot,
};
