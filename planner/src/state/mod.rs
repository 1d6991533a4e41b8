mod compare;
mod manager;
mod transition;

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use compare::{canonical_key, goal_reached};
pub(crate) use compare::values_match;
pub use manager::StateManager;
pub use transition::StateTransition;

/// World state as exchanged with collaborators: string keys to scalar or
/// collection values.
pub type StateMap = HashMap<String, Value>;

pub(crate) const LOCATION_HINTS: &[&str] = &["location", "room", "position", "place", "zone"];
pub(crate) const ENTITY_HINTS: &[&str] = &["object", "item", "entity", "holding", "tool"];

/// Snapshots retained by the environment before the oldest is dropped.
const HISTORY_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    Boolean,
    Numeric,
    Location,
    Inventory,
    Relation,
    Temporal,
}

impl VariableType {
    /// Heuristic inference from the shape of a value.
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Numeric,
            Value::String(s) => {
                let lowered = s.to_lowercase();
                if LOCATION_HINTS.iter().any(|hint| lowered.contains(hint)) {
                    Self::Location
                } else {
                    Self::Relation
                }
            }
            Value::Object(_) => Self::Inventory,
            Value::Array(_) => Self::Location,
            Value::Null => Self::Relation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVariable {
    pub name: String,
    pub value: Value,
    pub variable_type: VariableType,
    #[serde(default)]
    pub bounds: Option<(f64, f64)>,
}

impl StateVariable {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        let variable_type = VariableType::infer(&value);
        Self {
            name: name.into(),
            value,
            variable_type,
            bounds: None,
        }
    }
}

/// Entry in the append-only transition log.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionRecord {
    pub action_name: String,
    pub applied_at: DateTime<Utc>,
    pub cost: f64,
    pub probability: f64,
    pub parameters: StateMap,
}

/// The committed world state: typed variables, a bounded ring of prior
/// snapshots and a log of applied transitions. Search strategies never touch
/// this directly; they work on detached copies.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentState {
    variables: HashMap<String, StateVariable>,
    history: VecDeque<StateMap>,
    transition_log: Vec<TransitionRecord>,
}

impl EnvironmentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the variable map wholesale, pushing the previous snapshot
    /// onto the history ring first.
    pub fn load(&mut self, state: StateMap) {
        if !self.variables.is_empty() {
            self.push_history();
        }

        self.variables = state
            .into_iter()
            .map(|(name, value)| {
                let variable = StateVariable::new(name.clone(), value);
                (name, variable)
            })
            .collect();
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name).map(|v| &v.value)
    }

    pub fn variable(&self, name: &str) -> Option<&StateVariable> {
        self.variables.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        self.variables
            .insert(name.clone(), StateVariable::new(name, value));
    }

    pub fn snapshot(&self) -> StateMap {
        self.variables
            .iter()
            .map(|(name, variable)| (name.clone(), variable.value.clone()))
            .collect()
    }

    /// Checks the transition's preconditions against the current snapshot;
    /// on success merges its target values in and records it in the log.
    pub fn apply_transition(&mut self, transition: &StateTransition) -> bool {
        self.apply_transition_with(transition, StateMap::new())
    }

    pub(crate) fn apply_transition_with(
        &mut self,
        transition: &StateTransition,
        parameters: StateMap,
    ) -> bool {
        let snapshot = self.snapshot();
        if !transition.matches(&snapshot) {
            return false;
        }

        self.push_history();
        for (name, value) in transition.apply(&snapshot) {
            self.set(name, value);
        }

        self.transition_log.push(TransitionRecord {
            action_name: transition.action_name.clone(),
            applied_at: Utc::now(),
            cost: transition.cost,
            probability: transition.probability,
            parameters,
        });

        true
    }

    pub fn history(&self) -> &VecDeque<StateMap> {
        &self.history
    }

    pub fn transition_log(&self) -> &[TransitionRecord] {
        &self.transition_log
    }

    pub fn clear(&mut self) {
        self.variables.clear();
        self.history.clear();
        self.transition_log.clear();
    }

    fn push_history(&mut self) {
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(self.snapshot());
    }
}
