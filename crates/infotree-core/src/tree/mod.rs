pub mod action_node;
pub mod belief_node;
pub mod head;
pub mod histogram;
pub mod ids;
pub mod snapshot;
mod stats;

#[cfg(test)]
mod tests;
