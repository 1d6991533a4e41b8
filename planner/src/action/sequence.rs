use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Action, ActionStatus};
use crate::state::StateMap;

/// Ordered plan produced by the planner and consumed by execution and
/// evaluation collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSequence {
    id: String,
    actions: Vec<Action>,
    initial_state: StateMap,
    goal_state: StateMap,
    #[serde(default)]
    metadata: HashMap<String, Value>,
}

impl ActionSequence {
    pub fn new(actions: Vec<Action>, initial_state: StateMap, goal_state: StateMap) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            actions,
            initial_state,
            goal_state,
            metadata: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn initial_state(&self) -> &StateMap {
        &self.initial_state
    }

    pub fn goal_state(&self) -> &StateMap {
        &self.goal_state
    }

    pub fn metadata(&self) -> &HashMap<String, Value> {
        &self.metadata
    }

    pub fn insert_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Share of actions in a terminal successful state.
    pub fn completion_rate(&self) -> f64 {
        if self.actions.is_empty() {
            return 0.0;
        }

        let completed = self
            .actions
            .iter()
            .filter(|a| a.status() == ActionStatus::Completed)
            .count();

        completed as f64 / self.actions.len() as f64
    }

    pub fn total_duration(&self) -> f64 {
        self.actions.iter().map(|a| a.duration()).sum()
    }

    pub fn success_probability(&self) -> f64 {
        self.actions
            .iter()
            .map(|a| a.success_probability())
            .product()
    }

    /// Marks every still-pending action from `from` onwards as Skipped.
    /// This is the only place Skipped is assigned.
    pub fn skip_remaining(&mut self, from: usize) {
        for action in self.actions.iter_mut().skip(from) {
            if action.status() == ActionStatus::Pending {
                action.mark_skipped();
            }
        }
    }
}
