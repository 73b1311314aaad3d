use log::{debug, trace, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    model::GenerativeModel,
    planner::{
        config::{
            ConfigError, PlannerConfig, check_exploration, check_iterations, check_particles,
        },
        error::PlannerError,
    },
    probability::{uniform_belief, validate_belief},
    tree::{
        belief_node::BeliefNode,
        head::HeadBeliefNode,
        histogram::KnowledgeMode,
        ids::{ActionId, ObservationId, StateId},
        snapshot::TreeSnapshot,
    },
};

/// Online particle-belief Monte Carlo tree search planner.
///
/// Every belief node rewards itself with the knowledge measure of its particles,
/// so the planner favours actions that concentrate the belief. Top-level actions
/// are sampled round-robin so all of them get the same share of simulations.
///
/// The planner keeps its tree between calls: after acting, pass the action and
/// the observation received to [`Planner::best_action_after`] and the matching
/// subtree becomes the new root. There is no particle reinvigoration, so over
/// long episodes the root can run out of particles; the planner then restarts
/// from a uniform belief.
#[derive(Debug)]
pub struct Planner<'m, M: GenerativeModel> {
    model: &'m M,
    config: PlannerConfig,
    rng: ChaCha8Rng,
    head: HeadBeliefNode,
}

impl<'m, M: GenerativeModel> Planner<'m, M> {
    /// Create a planner over `model` whose random stream is seeded with `seed`.
    pub fn new(model: &'m M, config: PlannerConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_model(model)?;

        Ok(Planner {
            model,
            head: HeadBeliefNode::new(model.action_count(), config.knowledge),
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Drop the current tree, rebuild the root from `belief` and plan `horizon` steps ahead.
    ///
    /// A zero horizon leaves the tree untouched and returns action 0.
    pub fn best_action(&mut self, belief: &[f64], horizon: usize) -> Result<ActionId, PlannerError> {
        if horizon == 0 {
            return Ok(ActionId::from(0));
        }

        validate_belief(belief, self.model.state_count())?;

        self.head = HeadBeliefNode::from_belief(
            self.model.action_count(),
            self.config.particles,
            belief,
            self.config.knowledge,
            &mut self.rng,
        );
        if self.head.is_empty() {
            return Err(PlannerError::NoParticles);
        }

        Ok(self.run_simulations(horizon))
    }

    /// Move the root to the belief reached by `action` and `observation`, then plan.
    ///
    /// If the tree never saw that observation, or the subtree holds no particles,
    /// the planner restarts from a uniform belief over all states.
    pub fn best_action_after(
        &mut self,
        action: ActionId,
        observation: ObservationId,
        horizon: usize,
    ) -> Result<ActionId, PlannerError> {
        if horizon == 0 {
            return Ok(ActionId::from(0));
        }

        let action_count = self.model.action_count();
        if action.index() >= action_count {
            return Err(PlannerError::ActionOutOfRange {
                action_id: action,
                action_count,
            });
        }

        let detached = self
            .head
            .node_mut()
            .action_mut(action)
            .and_then(|action_node| action_node.detach(observation));

        let Some(child) = detached else {
            warn!(
                "observation {} never experienced in simulation after action {}, restarting with uniform belief",
                observation.index(),
                action.index()
            );
            return self.restart_uniform(horizon);
        };

        // The old tree, siblings included, is dropped here.
        self.head = HeadBeliefNode::from_belief_node(action_count, child);

        if self.head.is_empty() {
            warn!("lost track of the belief, restarting with uniform belief");
            return self.restart_uniform(horizon);
        }

        trace!(
            "promoted subtree with {} particles over {} states and {} visits",
            self.head.particle_total(),
            self.head.particles().len(),
            self.head.node().visits()
        );

        Ok(self.run_simulations(horizon))
    }

    fn restart_uniform(&mut self, horizon: usize) -> Result<ActionId, PlannerError> {
        let belief = uniform_belief(self.model.state_count());
        self.best_action(&belief, horizon)
    }

    fn run_simulations(&mut self, horizon: usize) -> ActionId {
        let mut simulation = Simulation {
            model: self.model,
            rng: &mut self.rng,
            exploration: self.config.exploration,
            max_switch_visits: self.config.max_switch_visits,
            mode: self.config.knowledge,
            max_depth: horizon,
            discount: self.model.discount(),
            action_count: self.model.action_count(),
            root_cursor: 0,
        };

        for _ in 0..self.config.iterations {
            let Some(state) = self.head.sample_particle(&mut *simulation.rng) else {
                break;
            };
            simulation.simulate(self.head.node_mut(), state, 0);
        }

        let root = self.head.node();
        let best = root.best_action_by_value().unwrap_or(ActionId::from(0));
        debug!(
            "planned {} iterations at horizon {}: best action {} (root value {:.6})",
            self.config.iterations,
            horizon,
            best.index(),
            root.value()
        );
        best
    }

    /// Return the most common particle at the root, the planner's guess of the true state.
    pub fn guess(&self) -> Option<StateId> {
        self.head.most_frequent_particle()
    }

    /// Return the mean value of every root action, in action order.
    pub fn root_action_values(&self) -> Vec<f64> {
        self.head
            .node()
            .actions()
            .iter()
            .map(|action| action.value())
            .collect()
    }

    /// Restart the random stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn root(&self) -> &HeadBeliefNode {
        &self.head
    }

    pub fn model(&self) -> &'m M {
        self.model
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Capture the current tree in a serializable form.
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::from_head(&self.head)
    }

    /// Set the particle count for roots built from probability beliefs.
    /// Beliefs created inside the tree by simulations are not bounded by this.
    pub fn set_particles(&mut self, particles: u32) -> Result<(), ConfigError> {
        check_particles(particles)?;
        self.config.particles = particles;
        Ok(())
    }

    pub fn particles(&self) -> u32 {
        self.config.particles
    }

    /// Set the number of simulations run per planning call.
    pub fn set_iterations(&mut self, iterations: u32) -> Result<(), ConfigError> {
        check_iterations(iterations)?;
        self.config.iterations = iterations;
        Ok(())
    }

    pub fn iterations(&self) -> u32 {
        self.config.iterations
    }

    /// Set the UCB exploration constant. This matters a lot for performance, tune it.
    pub fn set_exploration(&mut self, exploration: f64) -> Result<(), ConfigError> {
        check_exploration(exploration)?;
        self.config.exploration = exploration;
        Ok(())
    }

    pub fn exploration(&self) -> f64 {
        self.config.exploration
    }
}

pub(crate) fn validate_model<M: GenerativeModel>(model: &M) -> Result<(), ConfigError> {
    if model.state_count() == 0 {
        return Err(ConfigError::Invalid(
            "model must have at least one state".to_string(),
        ));
    }
    if model.action_count() == 0 {
        return Err(ConfigError::Invalid(
            "model must have at least one action".to_string(),
        ));
    }
    if model.observation_count() == 0 {
        return Err(ConfigError::Invalid(
            "model must have at least one observation".to_string(),
        ));
    }
    let discount = model.discount();
    if !discount.is_finite() || discount < 0.0 {
        return Err(ConfigError::Invalid(
            "model discount must be finite and >= 0".to_string(),
        ));
    }
    Ok(())
}

/// State of one planning call, borrowed out of the planner so the tree can be
/// walked mutably while the random stream is in use.
struct Simulation<'a, 'm, M: GenerativeModel> {
    model: &'m M,
    rng: &'a mut ChaCha8Rng,
    exploration: f64,
    max_switch_visits: u32,
    mode: KnowledgeMode,
    max_depth: usize,
    discount: f64,
    action_count: usize,
    root_cursor: usize,
}

impl<M: GenerativeModel> Simulation<'_, '_, M> {
    /// Run one episode from `node` in `state`, returning the value the parent should record.
    fn simulate(&mut self, node: &mut BeliefNode, state: StateId, depth: usize) -> f64 {
        node.record_visit();

        let action = if depth == 0 {
            let action = ActionId::from(self.root_cursor);
            self.root_cursor = (self.root_cursor + 1) % self.action_count;
            action
        } else {
            match node.select_action(self.exploration) {
                Some(action) => action,
                None => return 0.0,
            }
        };

        let (next_state, observation, _) = self.model.sample_transition(state, action, &mut *self.rng);

        let Some(action_node) = node.action_mut(action) else {
            return 0.0;
        };

        let mode = self.mode;
        let sample = {
            let (child, created) = action_node.child_or_insert(observation, || BeliefNode::new(mode));

            // The child's knowledge must be current before anything reads it.
            child.update_knowledge(next_state);

            if depth + 1 < self.max_depth && !created && !self.model.is_terminal(next_state) {
                child.expand(self.action_count);
                self.simulate(child, next_state, depth + 1)
            } else {
                child.record_leaf_visit(self.discount);
                if depth + 1 >= self.max_depth {
                    child.knowledge()
                } else {
                    0.0
                }
            }
        };

        action_node.record(sample);
        node.blend_action_value(action, sample, self.max_switch_visits);
        node.backup(self.discount)
    }
}
