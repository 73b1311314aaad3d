mod common;

use common::{FlipModel, SensorModel};
use infotree_core::{
    ActionId, ObservationId,
    probability::{
        belief_observation_probability, sample_probability, uniform_belief, update_belief,
        validate_belief,
    },
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn public_sampling_follows_probabilities() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let probs = [0.2, 0.0, 0.8];
    let mut counts = [0_u32; 3];
    for _ in 0..10_000 {
        counts[sample_probability(&probs, &mut rng)] += 1;
    }

    assert_eq!(counts[1], 0);
    let frequency = f64::from(counts[2]) / 10_000.0;
    assert!((frequency - 0.8).abs() < 0.02, "frequency {frequency}");
}

#[test]
fn public_uniform_belief_is_valid() {
    let belief = uniform_belief(4);
    assert_eq!(belief, vec![0.25; 4]);
    assert!(validate_belief(&belief, 4).is_ok());
    assert!(validate_belief(&[0.5, f64::NAN], 2).is_err());
}

#[test]
fn public_belief_update_applies_bayes_rule() {
    let model = FlipModel::new(0.9, 0.9);
    let belief = uniform_belief(2);
    let action = ActionId::from(0);
    let observation = ObservationId::from(1);

    let probability = belief_observation_probability(&model, &belief, action, observation);
    assert!((probability - 0.5).abs() < 1e-12);

    let posterior = update_belief(&model, &belief, action, observation)
        .expect("observation is possible");
    assert!((posterior[0] - 0.1).abs() < 1e-12);
    assert!((posterior[1] - 0.9).abs() < 1e-12);

    // The state flips before it is observed.
    let posterior = update_belief(&model, &[1.0, 0.0], action, ObservationId::from(1))
        .expect("observation is possible");
    assert_eq!(posterior, vec![0.0, 1.0]);
}

#[test]
fn public_impossible_observation_has_no_posterior() {
    let model = SensorModel::look_or_idle();
    let belief = uniform_belief(2);

    assert_eq!(
        belief_observation_probability(&model, &belief, ActionId::from(0), ObservationId::from(2)),
        0.0
    );
    assert_eq!(
        update_belief(&model, &belief, ActionId::from(0), ObservationId::from(2)),
        None
    );
}
