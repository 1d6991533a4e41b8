use std::collections::HashMap;

use super::{EnvironmentState, StateMap, StateTransition};
use crate::error::Error;
use crate::Result;

/// Owns the committed environment state, the registered transition
/// templates and the named state templates. The only mutation paths into
/// the committed snapshot are `load_state`, `apply_action`,
/// `apply_transition` and `reset`.
#[derive(Debug, Clone, Default)]
pub struct StateManager {
    environment: EnvironmentState,
    transitions: Vec<StateTransition>,
    templates: HashMap<String, StateMap>,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn environment(&self) -> &EnvironmentState {
        &self.environment
    }

    pub fn current_state(&self) -> StateMap {
        self.environment.snapshot()
    }

    pub fn load_state(&mut self, state: StateMap) {
        self.environment.load(state);
    }

    pub fn register_transition(&mut self, transition: StateTransition) {
        self.transitions.push(transition);
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    pub fn register_template(&mut self, name: impl Into<String>, state: StateMap) {
        self.templates.insert(name.into(), state);
    }

    pub fn load_template(&mut self, name: &str) -> Result<()> {
        let state = self
            .templates
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownTemplate(name.to_owned()))?;

        self.environment.load(state);
        Ok(())
    }

    /// Commits the first registered transition whose action name matches and
    /// whose preconditions hold against the current snapshot. Registration
    /// order is the contract; an ambiguous match set is logged.
    pub fn apply_action(&mut self, name: &str, parameters: StateMap) -> bool {
        let snapshot = self.environment.snapshot();
        let matching: Vec<&StateTransition> = self
            .transitions
            .iter()
            .filter(|t| t.action_name == name && t.matches(&snapshot))
            .collect();

        if matching.len() > 1 {
            tracing::warn!(
                "{} transitions match action '{}', committing the first registered",
                matching.len(),
                name
            );
        }

        let transition = match matching.first() {
            Some(transition) => (*transition).clone(),
            None => return false,
        };

        self.environment.apply_transition_with(&transition, parameters)
    }

    /// Identical match-and-apply logic against a detached copy; the
    /// committed state is untouched. Returns the resulting snapshot.
    pub fn simulate_action(&self, name: &str, parameters: StateMap) -> Option<StateMap> {
        let mut detached = self.clone();

        if detached.apply_action(name, parameters) {
            Some(detached.current_state())
        } else {
            None
        }
    }

    pub fn apply_transition(&mut self, transition: &StateTransition) -> bool {
        self.environment.apply_transition(transition)
    }

    pub fn reset(&mut self) {
        self.environment.clear();
        self.transitions.clear();
    }
}
