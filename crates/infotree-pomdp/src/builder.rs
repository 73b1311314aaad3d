use crate::{
    CompiledPomdp, EmissionSpec, ObservationOutcomeSpec, OutcomeSpec, PomdpError, PomdpSpec,
    StateSpec, TransitionSpec,
};

#[derive(Debug, Clone, Default)]
/// Incremental construction of a POMDP, mirroring the YAML schema.
pub struct PomdpBuilder {
    discount: Option<f64>,
    states: Vec<StateSpec>,
    actions: Vec<String>,
    observations: Vec<String>,
    transitions: Vec<TransitionSpec>,
    emissions: Vec<EmissionSpec>,
}

impl PomdpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_discount(&mut self, discount: f64) -> &mut Self {
        self.discount = Some(discount);
        self
    }

    /// Add a state. Terminal states need no transitions.
    pub fn add_state(&mut self, id: impl Into<String>, terminal: bool) -> &mut Self {
        self.states.push(StateSpec {
            id: id.into(),
            terminal: Some(terminal),
        });
        self
    }

    pub fn add_action(&mut self, id: impl Into<String>) -> &mut Self {
        self.actions.push(id.into());
        self
    }

    pub fn add_observation(&mut self, id: impl Into<String>) -> &mut Self {
        self.observations.push(id.into());
        self
    }

    /// Add one outcome of taking `action` in `state`.
    /// Outcomes of the same pair accumulate into a single transition.
    pub fn add_transition(
        &mut self,
        state: impl AsRef<str>,
        action: impl AsRef<str>,
        next: impl Into<String>,
        prob: f64,
        reward: f64,
    ) -> Result<&mut Self, PomdpError> {
        let state = state.as_ref();
        let action = action.as_ref();
        self.require_state(state)?;
        self.require_action(action)?;

        let outcome = OutcomeSpec {
            next: next.into(),
            prob,
            reward,
        };
        match self
            .transitions
            .iter_mut()
            .find(|t| t.state == state && t.action == action)
        {
            Some(transition) => transition.outcomes.push(outcome),
            None => self.transitions.push(TransitionSpec {
                state: state.to_string(),
                action: action.to_string(),
                outcomes: vec![outcome],
            }),
        }

        Ok(self)
    }

    /// Add one observation outcome after arriving in `next`.
    /// `action: None` applies to every action without its own emission.
    pub fn add_emission(
        &mut self,
        next: impl AsRef<str>,
        action: Option<&str>,
        observation: impl Into<String>,
        prob: f64,
    ) -> Result<&mut Self, PomdpError> {
        let next = next.as_ref();
        self.require_state(next)?;
        if let Some(action) = action {
            self.require_action(action)?;
        }

        let outcome = ObservationOutcomeSpec {
            observation: observation.into(),
            prob,
        };
        match self
            .emissions
            .iter_mut()
            .find(|e| e.next == next && e.action.as_deref() == action)
        {
            Some(emission) => emission.outcomes.push(outcome),
            None => self.emissions.push(EmissionSpec {
                next: next.to_string(),
                action: action.map(str::to_string),
                outcomes: vec![outcome],
            }),
        }

        Ok(self)
    }

    fn require_state(&self, state: &str) -> Result<(), PomdpError> {
        if self.states.iter().any(|s| s.id == state) {
            return Ok(());
        }
        Err(PomdpError::UnknownId {
            kind: "state",
            id: state.to_string(),
        })
    }

    fn require_action(&self, action: &str) -> Result<(), PomdpError> {
        if self.actions.iter().any(|a| a == action) {
            return Ok(());
        }
        Err(PomdpError::UnknownId {
            kind: "action",
            id: action.to_string(),
        })
    }

    pub fn build_spec(self) -> Result<PomdpSpec, PomdpError> {
        let discount = self.discount.ok_or(PomdpError::MissingDiscount)?;
        let spec = PomdpSpec {
            version: Some(1),
            discount,
            states: self.states,
            actions: self.actions,
            observations: self.observations,
            transitions: self.transitions,
            emissions: self.emissions,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn compile(self) -> Result<CompiledPomdp, PomdpError> {
        let spec = self.build_spec()?;
        spec.compile()
    }
}
