use infotree_core::PlannerError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for POMDP loading, validation, compilation, builder and simulator operations.
pub enum PomdpError {
    #[error("failed to read YAML file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("model must declare at least one {kind}")]
    Empty { kind: &'static str },

    #[error("discount must be finite and within [0, 1], got {value}")]
    InvalidDiscount { value: f64 },

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("unknown {kind} '{id}'")]
    UnknownId { kind: &'static str, id: String },

    #[error("state '{state}' is terminal and cannot declare transitions")]
    TerminalStateHasTransitions { state: String },

    #[error("transition for state '{state}', action '{action}' is declared twice")]
    DuplicateTransition { state: String, action: String },

    #[error("no transition declared for state '{state}', action '{action}'")]
    MissingTransition { state: String, action: String },

    #[error("emission for next state '{next}', action '{action}' is declared twice")]
    DuplicateEmission { next: String, action: String },

    #[error("no emission declared for next state '{next}', action '{action}'")]
    MissingEmission { next: String, action: String },

    #[error("{context} must contain at least one outcome")]
    EmptyOutcomes { context: String },

    #[error("invalid probability in {context}, outcome {outcome_index}: {value}")]
    InvalidProbability {
        context: String,
        outcome_index: usize,
        value: f64,
    },

    #[error("invalid reward in {context}, outcome {outcome_index}: {value}")]
    InvalidReward {
        context: String,
        outcome_index: usize,
        value: f64,
    },

    #[error("probability sum for {context} must be within {tolerance} of 1.0, got {sum}")]
    ProbabilitySum {
        context: String,
        sum: f64,
        tolerance: f64,
    },

    #[error("builder is missing a discount")]
    MissingDiscount,

    #[error("{kind} index {index} is out of range for {count} {kind}s")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        count: usize,
    },

    #[error(transparent)]
    Belief(#[from] PlannerError),
}
