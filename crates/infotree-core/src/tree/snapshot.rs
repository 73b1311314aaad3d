use serde::Serialize;

use crate::tree::{belief_node::BeliefNode, head::HeadBeliefNode};

const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeSnapshot {
    pub schema_version: u32,
    pub root_node_id: usize,
    pub node_count: usize,
    pub root_particles: Vec<ParticleSnapshot>,
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleSnapshot {
    pub state_id: usize,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub node_id: usize,
    pub depth: usize,
    pub parent_node_id: Option<usize>,
    pub parent_action_id: Option<usize>,
    pub parent_observation_id: Option<usize>,
    pub visits: u32,
    pub particle_total: u32,
    pub knowledge: f64,
    pub actions_value: f64,
    pub value: f64,
    pub maximizing: bool,
    pub best_action_id: usize,
    pub actions: Vec<ActionNodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionNodeSnapshot {
    pub action_id: usize,
    pub visits: u32,
    pub value: f64,
    pub children: Vec<ObservationSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationSnapshot {
    pub observation_id: usize,
    pub child_node_id: usize,
}

impl TreeSnapshot {
    /// Flatten the tree under `head` into a list of nodes, depth first.
    /// Observation children are listed in increasing observation order.
    pub fn from_head(head: &HeadBeliefNode) -> Self {
        let mut nodes = Vec::new();
        push_node(&mut nodes, head.node(), 0, None);

        let root_particles = head
            .particles()
            .iter()
            .map(|(state, count)| ParticleSnapshot {
                state_id: state.index(),
                count: *count,
            })
            .collect();

        TreeSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            root_node_id: 0,
            node_count: nodes.len(),
            root_particles,
            nodes,
        }
    }

    /// Serialize the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn push_node(
    nodes: &mut Vec<NodeSnapshot>,
    node: &BeliefNode,
    depth: usize,
    parent: Option<(usize, usize, usize)>,
) -> usize {
    let node_id = nodes.len();
    nodes.push(NodeSnapshot {
        node_id,
        depth,
        parent_node_id: parent.map(|(id, _, _)| id),
        parent_action_id: parent.map(|(_, action, _)| action),
        parent_observation_id: parent.map(|(_, _, observation)| observation),
        visits: node.visits(),
        particle_total: node.histogram().total(),
        knowledge: node.knowledge(),
        actions_value: node.actions_value(),
        value: node.value(),
        maximizing: node.is_maximizing(),
        best_action_id: node.best_action().index(),
        actions: Vec::with_capacity(node.actions().len()),
    });

    for (action_idx, action) in node.actions().iter().enumerate() {
        let mut children: Vec<_> = action.children().collect();
        children.sort_unstable_by_key(|(observation, _)| *observation);

        let mut observations = Vec::with_capacity(children.len());
        for (observation, child) in children {
            let child_node_id = push_node(
                nodes,
                child,
                depth + 1,
                Some((node_id, action_idx, observation.index())),
            );
            observations.push(ObservationSnapshot {
                observation_id: observation.index(),
                child_node_id,
            });
        }

        nodes[node_id].actions.push(ActionNodeSnapshot {
            action_id: action_idx,
            visits: action.visits(),
            value: action.value(),
            children: observations,
        });
    }

    node_id
}
