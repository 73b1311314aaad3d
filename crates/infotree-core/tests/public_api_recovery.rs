mod common;

use common::SensorModel;
use infotree_core::{
    ActionId, ObservationId, Planner, PlannerConfig, probability::uniform_belief,
};

fn config() -> PlannerConfig {
    PlannerConfig::new(200, 300, 2.0, 100)
}

#[test]
fn public_unseen_observation_restarts_from_uniform_belief() {
    let model = SensorModel::look_or_idle();

    let mut stale_a = Planner::new(&model, config(), 1).expect("valid planner");
    stale_a
        .best_action(&[1.0, 0.0], 3)
        .expect("planning should succeed");
    let mut stale_b = Planner::new(&model, config(), 2).expect("valid planner");
    stale_b
        .best_action(&[0.0, 1.0], 2)
        .expect("planning should succeed");

    // Observation 2 is never emitted, so neither tree has a matching branch.
    stale_a.reseed(99);
    stale_b.reseed(99);
    let action_a = stale_a
        .best_action_after(ActionId::from(0), ObservationId::from(2), 3)
        .expect("recovery is not an error");
    let action_b = stale_b
        .best_action_after(ActionId::from(0), ObservationId::from(2), 3)
        .expect("recovery is not an error");

    assert_eq!(action_a, action_b);
    assert_eq!(stale_a.snapshot(), stale_b.snapshot());

    let mut fresh = Planner::new(&model, config(), 99).expect("valid planner");
    let fresh_action = fresh
        .best_action(&uniform_belief(2), 3)
        .expect("planning should succeed");

    assert_eq!(action_a, fresh_action);
    assert_eq!(stale_a.snapshot(), fresh.snapshot());
}

#[test]
fn public_unplanned_planner_recovers_on_first_update() {
    let model = SensorModel::look_or_idle();
    let mut planner = Planner::new(&model, config(), 4).expect("valid planner");

    planner
        .best_action_after(ActionId::from(1), ObservationId::from(0), 2)
        .expect("recovery is not an error");

    assert_eq!(planner.root().particle_total(), 200);
    assert_eq!(planner.root().particles().len(), 2);
}

#[test]
fn public_promoted_subtree_keeps_its_statistics() {
    let model = SensorModel::look_or_idle();
    let mut planner = Planner::new(&model, config(), 8).expect("valid planner");
    planner
        .best_action(&uniform_belief(2), 3)
        .expect("planning should succeed");

    let before = planner.snapshot();
    let child = before
        .nodes
        .iter()
        .find(|node| {
            node.parent_node_id == Some(before.root_node_id)
                && node.parent_action_id == Some(0)
                && node.parent_observation_id == Some(1)
        })
        .expect("looking must have produced observation 1")
        .clone();

    planner
        .best_action_after(ActionId::from(0), ObservationId::from(1), 2)
        .expect("replanning should succeed");

    let after = planner.snapshot();
    let root = &after.nodes[after.root_node_id];
    assert_eq!(root.visits, child.visits + 300);
    let root_particles: u32 = after.root_particles.iter().map(|particle| particle.count).sum();
    assert_eq!(root_particles, child.particle_total);
    assert!(root_particles > 0);

    // Observation 1 leans towards state 1.
    assert_eq!(planner.guess(), Some(1.into()));
}
