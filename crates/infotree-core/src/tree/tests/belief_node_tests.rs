use crate::tree::{
    action_node::ActionNode,
    belief_node::BeliefNode,
    histogram::KnowledgeMode,
    ids::{ActionId, ObservationId, StateId},
};

fn record(node: &mut BeliefNode, action: usize, sample: f64, max_switch_visits: u32) {
    let action = ActionId::from(action);
    node.record_visit();
    node.action_mut(action)
        .expect("action exists")
        .record(sample);
    node.blend_action_value(action, sample, max_switch_visits);
}

#[test]
fn unexpanded_node_cannot_select() {
    let node = BeliefNode::new(KnowledgeMode::MaxFrequency);

    assert!(!node.is_expanded());
    assert_eq!(node.select_action(1.0), None);
    assert_eq!(node.best_action_by_value(), None);
}

#[test]
fn ucb_tries_unvisited_actions_in_order() {
    let mut node = BeliefNode::new(KnowledgeMode::MaxFrequency);
    node.expand(3);

    record(&mut node, 0, 10.0, 100);
    assert_eq!(node.select_action(0.0), Some(ActionId::from(1)));

    record(&mut node, 1, 1.0, 100);
    assert_eq!(node.select_action(0.0), Some(ActionId::from(2)));

    record(&mut node, 2, 2.0, 100);
    // Without exploration the best mean wins.
    assert_eq!(node.select_action(0.0), Some(ActionId::from(0)));
}

#[test]
fn ucb_bonus_favours_rarely_taken_actions() {
    let mut node = BeliefNode::new(KnowledgeMode::MaxFrequency);
    node.expand(2);

    for _ in 0..20 {
        record(&mut node, 0, 1.0, 100);
    }
    record(&mut node, 1, 0.9, 100);

    assert_eq!(node.select_action(0.0), Some(ActionId::from(0)));
    assert_eq!(node.select_action(2.0), Some(ActionId::from(1)));
}

#[test]
fn node_reports_mean_then_switches_to_best_action() {
    let mut node = BeliefNode::new(KnowledgeMode::MaxFrequency);
    node.expand(2);

    record(&mut node, 0, 1.0, 3);
    assert_eq!(node.actions_value(), 1.0);

    record(&mut node, 1, 3.0, 3);
    assert_eq!(node.actions_value(), 2.0);
    assert!(!node.is_maximizing());

    // Third visit crosses the threshold: adopt the best action right away.
    record(&mut node, 0, 0.0, 3);
    assert!(node.is_maximizing());
    assert_eq!(node.best_action(), ActionId::from(1));
    assert_eq!(node.actions_value(), 3.0);

    // The incumbent dropping forces a recomputation.
    record(&mut node, 1, 1.0, 3);
    assert_eq!(node.best_action(), ActionId::from(1));
    assert_eq!(node.actions_value(), 2.0);

    // A better challenger takes over.
    record(&mut node, 0, 5.5, 3);
    assert_eq!(node.best_action(), ActionId::from(0));
    assert!((node.actions_value() - 6.5 / 3.0).abs() < 1e-12);
}

#[test]
fn backup_blends_knowledge_and_corrects_history() {
    let mut node = BeliefNode::new(KnowledgeMode::MaxFrequency);
    node.expand(1);
    node.update_knowledge(StateId::from(0));

    record(&mut node, 0, 2.0, 10);
    let first = node.backup(0.5);
    assert_eq!(node.value(), 0.5 * 2.0 + 1.0);
    assert_eq!(first, node.value());

    record(&mut node, 0, 4.0, 10);
    let old_value = node.value();
    let second = node.backup(0.5);
    assert_eq!(node.value(), 0.5 * 3.0 + 1.0);
    assert!((second - ((node.value() - old_value) + node.value())).abs() < 1e-12);
}

#[test]
fn leaf_visits_keep_expanded_value_in_sync() {
    let mut node = BeliefNode::new(KnowledgeMode::MaxFrequency);
    node.update_knowledge(StateId::from(0));
    node.record_leaf_visit(0.9);
    assert_eq!(node.visits(), 1);
    assert_eq!(node.value(), 0.0);

    node.expand(1);
    node.update_knowledge(StateId::from(1));
    node.record_leaf_visit(0.9);
    assert_eq!(node.visits(), 2);
    assert_eq!(node.value(), 0.9 * node.actions_value() + node.knowledge());
}

#[test]
fn action_children_are_created_once_per_observation() {
    let mut action = ActionNode::new();
    assert_eq!(action.children_len(), 0);

    for raw_observation in [2, 0, 2] {
        let (child, _) = action.child_or_insert(ObservationId::from(raw_observation), || {
            BeliefNode::new(KnowledgeMode::MaxFrequency)
        });
        child.update_knowledge(StateId::from(raw_observation));
    }
    assert_eq!(action.children_len(), 2);

    let (_, created) = action.child_or_insert(ObservationId::from(0), || {
        BeliefNode::new(KnowledgeMode::MaxFrequency)
    });
    assert!(!created);

    let detached = action.detach(ObservationId::from(2)).expect("child exists");
    assert_eq!(detached.histogram().total(), 2);
    assert_eq!(action.children_len(), 1);
    assert!(action.child(ObservationId::from(2)).is_none());
}
