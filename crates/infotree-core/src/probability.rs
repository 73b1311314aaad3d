//! Dense belief helpers shared by both planners.

use rand::Rng;

use crate::{
    model::ExactModel,
    planner::error::PlannerError,
    tree::ids::{ActionId, ObservationId, StateId},
};

/// Probability distribution over states, one entry per state.
pub type Belief = Vec<f64>;

/// Floating point tolerance used when checking that a belief sums to one.
pub const BELIEF_TOLERANCE: f64 = 1e-6;

/// Draw one index according to `probabilities`.
///
/// Rounding slack at the top of the CDF is assigned to the last index with
/// non-zero probability.
pub fn sample_probability<R: Rng + ?Sized>(probabilities: &[f64], rng: &mut R) -> usize {
    let sample: f64 = rng.r#gen();
    let mut cumulative = 0.0_f64;
    let mut last_possible = 0;

    for (i, p) in probabilities.iter().enumerate() {
        if *p <= 0.0 {
            continue;
        }
        cumulative += p;
        last_possible = i;
        if sample < cumulative {
            return i;
        }
    }

    last_possible
}

/// Belief assigning the same mass to every state.
pub fn uniform_belief(state_count: usize) -> Belief {
    vec![1.0 / state_count as f64; state_count]
}

/// Check the shape and mass of a belief supplied by a caller.
pub fn validate_belief(belief: &[f64], state_count: usize) -> Result<(), PlannerError> {
    if belief.len() != state_count {
        return Err(PlannerError::BeliefSizeMismatch {
            expected: state_count,
            actual: belief.len(),
        });
    }

    if belief.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(PlannerError::InvalidBelief {
            reason: "entries must be finite and non-negative".to_string(),
        });
    }

    let sum: f64 = belief.iter().sum();
    if (sum - 1.0).abs() > BELIEF_TOLERANCE {
        return Err(PlannerError::InvalidBelief {
            reason: format!("entries must sum to 1, got {sum}"),
        });
    }

    Ok(())
}

/// Push a belief through the transition model: `Σ_s T(s, a, s1) b(s)` for every `s1`.
pub fn predict_belief<M: ExactModel>(model: &M, belief: &[f64], action: ActionId) -> Belief {
    let state_count = model.state_count();
    let mut predicted = vec![0.0; state_count];

    for (s, p) in belief.iter().enumerate() {
        if *p == 0.0 {
            continue;
        }
        let state = StateId::from(s);
        for (s1, mass) in predicted.iter_mut().enumerate() {
            *mass += p * model.transition_probability(state, action, StateId::from(s1));
        }
    }

    predicted
}

/// Condition a predicted belief on an observation.
///
/// Returns the probability of the observation and the normalized posterior, or
/// `None` for the posterior when the observation cannot happen.
pub fn condition_on_observation<M: ExactModel>(
    model: &M,
    predicted: &[f64],
    action: ActionId,
    observation: ObservationId,
) -> (f64, Option<Belief>) {
    let mut posterior: Belief = predicted
        .iter()
        .enumerate()
        .map(|(s1, p)| p * model.observation_probability(StateId::from(s1), action, observation))
        .collect();

    let evidence: f64 = posterior.iter().sum();
    if evidence <= 0.0 {
        return (0.0, None);
    }

    for p in &mut posterior {
        *p /= evidence;
    }
    (evidence, Some(posterior))
}

/// Probability of seeing `observation` after taking `action` in `belief`.
pub fn belief_observation_probability<M: ExactModel>(
    model: &M,
    belief: &[f64],
    action: ActionId,
    observation: ObservationId,
) -> f64 {
    let predicted = predict_belief(model, belief, action);
    condition_on_observation(model, &predicted, action, observation).0
}

/// Exact Bayes update of `belief` after taking `action` and seeing `observation`.
/// Returns `None` when the observation has zero probability under the belief.
pub fn update_belief<M: ExactModel>(
    model: &M,
    belief: &[f64],
    action: ActionId,
    observation: ObservationId,
) -> Option<Belief> {
    let predicted = predict_belief(model, belief, action);
    condition_on_observation(model, &predicted, action, observation).1
}
