use std::path::PathBuf;

use infotree_core::{
    BeliefReward, GenerativeModel, Lookahead, Planner, PlannerConfig,
    probability::{uniform_belief, update_belief},
};
use infotree_pomdp::{PomdpSimulator, compile_yaml};
use log::LevelFilter;

const HORIZON: usize = 3;
const STEPS: usize = 10;

fn main() {
    simple_logging::log_to_stderr(LevelFilter::Debug);

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crates/infotree-pomdp/examples/tiger.pomdp.yaml"));

    let pomdp = compile_yaml(&path).expect("failed to compile POMDP YAML");
    let config = PlannerConfig::from_default_yaml().expect("default planner config");

    let mut world = PomdpSimulator::new(pomdp.clone(), 12345);
    let mut planner = Planner::new(&pomdp, config, 54321).expect("invalid planner setup");
    let mut lookahead = Lookahead::new(&pomdp, 10.0, BeliefReward::Model)
        .expect("invalid lookahead setup");

    let mut belief = uniform_belief(pomdp.state_count());
    world.reset(&belief).expect("uniform belief is valid");

    let mut action = planner
        .best_action(&belief, HORIZON)
        .expect("planning failed");

    for step in 0..STEPS {
        let (observation, reward) = world.step(action).expect("planner returned a valid action");
        belief = update_belief(&pomdp, &belief, action, observation)
            .unwrap_or_else(|| uniform_belief(pomdp.state_count()));

        let next_action = planner
            .best_action_after(action, observation, HORIZON)
            .expect("replanning failed");
        let (greedy, greedy_value) = lookahead
            .best_action(&belief, 2)
            .expect("belief stays valid");

        println!(
            "step={step} action={} observation={} reward={reward:.1} guess={} truth={} reward_seeking={} ({greedy_value:.3})",
            pomdp.action_id(action).unwrap_or("?"),
            pomdp.observation_id(observation).unwrap_or("?"),
            planner
                .guess()
                .and_then(|state| pomdp.state_id(state))
                .unwrap_or("?"),
            pomdp.state_id(world.state()).unwrap_or("?"),
            pomdp.action_id(greedy).unwrap_or("?"),
        );
        action = next_action;
    }
}
