use rand::Rng;

use crate::{
    probability::sample_probability,
    tree::{
        belief_node::BeliefNode,
        histogram::KnowledgeMode,
        ids::StateId,
    },
};

#[derive(Debug, Clone)]
/// The root of the search tree.
///
/// Deep nodes keep a histogram that is cheap to update. The root is only ever
/// sampled from, so its particles are flattened into a `(state, count)` list once.
pub struct HeadBeliefNode {
    node: BeliefNode,
    particles: Vec<(StateId, u32)>,
    total: u32,
}

impl HeadBeliefNode {
    /// Create an empty root with `action_count` unexplored actions.
    pub fn new(action_count: usize, mode: KnowledgeMode) -> Self {
        let mut node = BeliefNode::new(mode);
        node.expand(action_count);
        HeadBeliefNode {
            node,
            particles: Vec::new(),
            total: 0,
        }
    }

    /// Create a root holding `particle_count` particles drawn from `belief`.
    pub fn from_belief<R: Rng + ?Sized>(
        action_count: usize,
        particle_count: u32,
        belief: &[f64],
        mode: KnowledgeMode,
        rng: &mut R,
    ) -> Self {
        let mut node = BeliefNode::new(mode);
        for _ in 0..particle_count {
            node.update_knowledge(StateId::from(sample_probability(belief, rng)));
        }
        Self::from_belief_node(action_count, node)
    }

    /// Promote a node detached from a previous tree into the root.
    /// Its statistics and subtree are kept, its histogram is flattened and released.
    pub fn from_belief_node(action_count: usize, mut node: BeliefNode) -> Self {
        node.expand(action_count);
        let particles = node.take_histogram().into_particles();
        let total = particles.iter().map(|(_, count)| *count).sum();
        HeadBeliefNode {
            node,
            particles,
            total,
        }
    }

    /// Whether the root ran out of particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Draw one state proportionally to its particle count.
    /// Returns `None` when the root holds no particles.
    pub fn sample_particle<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<StateId> {
        if self.total == 0 {
            return None;
        }

        let mut pick = rng.gen_range(1..=self.total);
        for (state, count) in &self.particles {
            if pick <= *count {
                return Some(*state);
            }
            pick -= count;
        }
        None
    }

    /// Return the state with the most particles, the first one on ties.
    pub fn most_frequent_particle(&self) -> Option<StateId> {
        let mut best: Option<(StateId, u32)> = None;
        for (state, count) in &self.particles {
            match best {
                Some((_, best_count)) if best_count >= *count => {}
                _ => best = Some((*state, *count)),
            }
        }
        best.map(|(state, _)| state)
    }

    /// Return the flattened `(state, count)` particle list.
    pub fn particles(&self) -> &[(StateId, u32)] {
        &self.particles
    }

    /// Return the total amount of particles held by the root.
    pub fn particle_total(&self) -> u32 {
        self.total
    }

    pub fn node(&self) -> &BeliefNode {
        &self.node
    }

    pub(crate) fn node_mut(&mut self) -> &mut BeliefNode {
        &mut self.node
    }
}
