use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{CompiledPomdp, PomdpError, compiled::PROB_TOLERANCE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Serializable POMDP schema used for YAML IO and validation.
pub struct PomdpSpec {
    /// Schema version for future compatibility checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub discount: f64,
    pub states: Vec<StateSpec>,
    pub actions: Vec<String>,
    pub observations: Vec<String>,
    /// One entry per non-terminal `(state, action)` pair.
    #[serde(default)]
    pub transitions: Vec<TransitionSpec>,
    /// Observation distributions keyed by the state reached.
    #[serde(default)]
    pub emissions: Vec<EmissionSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSpec {
    pub id: String,
    /// Terminal states loop onto themselves with zero reward (defaults to `false`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Stochastic outcomes of taking `action` in `state`.
pub struct TransitionSpec {
    pub state: String,
    pub action: String,
    pub outcomes: Vec<OutcomeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSpec {
    pub next: String,
    pub prob: f64,
    pub reward: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Observation distribution after arriving in `next`.
///
/// Without an action the emission applies to every action that has no
/// emission of its own.
pub struct EmissionSpec {
    pub next: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub outcomes: Vec<ObservationOutcomeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationOutcomeSpec {
    pub observation: String,
    pub prob: f64,
}

impl TransitionSpec {
    pub(crate) fn context(&self) -> String {
        format!("transition for state '{}', action '{}'", self.state, self.action)
    }
}

impl EmissionSpec {
    pub(crate) fn action_label(&self) -> &str {
        self.action.as_deref().unwrap_or("*")
    }

    pub(crate) fn context(&self) -> String {
        format!(
            "emission for next state '{}', action '{}'",
            self.next,
            self.action_label()
        )
    }
}

impl PomdpSpec {
    /// Validate schema invariants using the crate default tolerance.
    pub fn validate(&self) -> Result<(), PomdpError> {
        self.validate_with_tolerance(PROB_TOLERANCE)
    }

    /// Validate ids, references, coverage and probability constraints.
    pub fn validate_with_tolerance(&self, tolerance: f64) -> Result<(), PomdpError> {
        if !self.discount.is_finite() || !(0.0..=1.0).contains(&self.discount) {
            return Err(PomdpError::InvalidDiscount {
                value: self.discount,
            });
        }

        let states = index_ids("state", self.states.iter().map(|s| s.id.as_str()))?;
        let actions = index_ids("action", self.actions.iter().map(String::as_str))?;
        let observations =
            index_ids("observation", self.observations.iter().map(String::as_str))?;

        let terminal: HashSet<&str> = self
            .states
            .iter()
            .filter(|s| s.terminal.unwrap_or(false))
            .map(|s| s.id.as_str())
            .collect();

        let mut declared = HashSet::with_capacity(self.transitions.len());
        for transition in &self.transitions {
            lookup(&states, "state", &transition.state)?;
            lookup(&actions, "action", &transition.action)?;

            if terminal.contains(transition.state.as_str()) {
                return Err(PomdpError::TerminalStateHasTransitions {
                    state: transition.state.clone(),
                });
            }
            if !declared.insert((transition.state.as_str(), transition.action.as_str())) {
                return Err(PomdpError::DuplicateTransition {
                    state: transition.state.clone(),
                    action: transition.action.clone(),
                });
            }

            let context = transition.context();
            if transition.outcomes.is_empty() {
                return Err(PomdpError::EmptyOutcomes { context });
            }

            let mut sum = 0.0_f64;
            for (i, outcome) in transition.outcomes.iter().enumerate() {
                check_probability(&context, i, outcome.prob)?;
                if !outcome.reward.is_finite() {
                    return Err(PomdpError::InvalidReward {
                        context,
                        outcome_index: i,
                        value: outcome.reward,
                    });
                }
                lookup(&states, "state", &outcome.next)?;
                sum += outcome.prob;
            }
            check_sum(context, sum, tolerance)?;
        }

        // Every non-terminal state needs a transition for every action.
        for state in &self.states {
            if terminal.contains(state.id.as_str()) {
                continue;
            }
            for action in &self.actions {
                if !declared.contains(&(state.id.as_str(), action.as_str())) {
                    return Err(PomdpError::MissingTransition {
                        state: state.id.clone(),
                        action: action.clone(),
                    });
                }
            }
        }

        let mut generic = HashSet::new();
        let mut specific = HashSet::new();
        for emission in &self.emissions {
            lookup(&states, "state", &emission.next)?;

            let fresh = match &emission.action {
                Some(action) => {
                    lookup(&actions, "action", action)?;
                    specific.insert((emission.next.as_str(), action.as_str()))
                }
                None => generic.insert(emission.next.as_str()),
            };
            if !fresh {
                return Err(PomdpError::DuplicateEmission {
                    next: emission.next.clone(),
                    action: emission.action_label().to_string(),
                });
            }

            let context = emission.context();
            if emission.outcomes.is_empty() {
                return Err(PomdpError::EmptyOutcomes { context });
            }

            let mut sum = 0.0_f64;
            for (i, outcome) in emission.outcomes.iter().enumerate() {
                check_probability(&context, i, outcome.prob)?;
                lookup(&observations, "observation", &outcome.observation)?;
                sum += outcome.prob;
            }
            check_sum(context, sum, tolerance)?;
        }

        for state in &self.states {
            if generic.contains(state.id.as_str()) {
                continue;
            }
            for action in &self.actions {
                if !specific.contains(&(state.id.as_str(), action.as_str())) {
                    return Err(PomdpError::MissingEmission {
                        next: state.id.clone(),
                        action: action.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Compile this spec into the runtime representation.
    pub fn compile(&self) -> Result<CompiledPomdp, PomdpError> {
        CompiledPomdp::from_spec(self)
    }
}

/// Map every id to its position, rejecting empty lists and duplicates.
pub(crate) fn index_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<HashMap<&'a str, usize>, PomdpError> {
    let mut index = HashMap::new();
    for id in ids {
        let position = index.len();
        if index.insert(id, position).is_some() {
            return Err(PomdpError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }

    if index.is_empty() {
        return Err(PomdpError::Empty { kind });
    }
    Ok(index)
}

pub(crate) fn lookup(
    index: &HashMap<&str, usize>,
    kind: &'static str,
    id: &str,
) -> Result<usize, PomdpError> {
    index.get(id).copied().ok_or_else(|| PomdpError::UnknownId {
        kind,
        id: id.to_string(),
    })
}

fn check_probability(context: &str, outcome_index: usize, value: f64) -> Result<(), PomdpError> {
    if !value.is_finite() || value < 0.0 {
        return Err(PomdpError::InvalidProbability {
            context: context.to_string(),
            outcome_index,
            value,
        });
    }
    Ok(())
}

fn check_sum(context: String, sum: f64, tolerance: f64) -> Result<(), PomdpError> {
    if (sum - 1.0).abs() > tolerance {
        return Err(PomdpError::ProbabilitySum {
            context,
            sum,
            tolerance,
        });
    }
    Ok(())
}
