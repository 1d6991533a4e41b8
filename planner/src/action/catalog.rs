use std::collections::HashMap;

use serde_json::Value;

use super::{Action, ActionType};
use crate::Result;

/// Explicit action-definition registry. Constructed once and passed by
/// reference wherever a library of operators is needed; there is no
/// process-global catalog.
#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    actions: Vec<Action>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of common embodied-agent operators, used by tests and demo
    /// callers.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();

        catalog.register(Action::new(
            "open_door",
            ActionType::Manipulation,
            &["door_closed"],
            &["door_closed=false", "door_open=true"],
            1.0,
            0.95,
        )?);
        catalog.register(Action::new(
            "close_door",
            ActionType::Manipulation,
            &["door_open"],
            &["door_open=false", "door_closed=true"],
            1.0,
            0.95,
        )?);
        catalog.register(Action::new(
            "pick_up",
            ActionType::Manipulation,
            &["object_present", "holding!=true"],
            &["holding=true", "object_present=false"],
            2.0,
            0.9,
        )?);
        catalog.register(Action::new(
            "put_down",
            ActionType::Manipulation,
            &["holding"],
            &["holding=false", "object_present=true"],
            2.0,
            0.95,
        )?);
        catalog.register(Action::new(
            "observe",
            ActionType::Observation,
            &[],
            &["observed=true"],
            0.5,
            1.0,
        )?);
        catalog.register(Action::new(
            "wait",
            ActionType::Wait,
            &[],
            &["waited=true"],
            1.0,
            1.0,
        )?);

        Ok(catalog)
    }

    pub fn register(&mut self, action: Action) {
        if self.get(action.name()).is_some() {
            tracing::warn!("Replacing already registered action '{}'", action.name());
            self.actions.retain(|a| a.name() != action.name());
        }

        self.actions.push(action);
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name() == name)
    }

    pub fn all(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Clone of the named action with the given parameter overrides merged
    /// over the registered defaults.
    pub fn instantiate(&self, name: &str, parameters: HashMap<String, Value>) -> Option<Action> {
        let template = self.get(name)?;

        let mut merged = template.parameters().clone();
        merged.extend(parameters);

        Some(template.clone().with_parameters(merged))
    }
}
