mod builder;
mod compiled;
mod error;
mod io;
mod simulator;
mod spec;

pub use builder::PomdpBuilder;
pub use compiled::CompiledPomdp;
pub use error::PomdpError;
pub use io::{compile_yaml, load_yaml, save_yaml};
pub use simulator::PomdpSimulator;
pub use spec::{
    EmissionSpec, ObservationOutcomeSpec, OutcomeSpec, PomdpSpec, StateSpec, TransitionSpec,
};
