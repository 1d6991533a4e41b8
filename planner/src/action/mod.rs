mod catalog;
mod predicate;
mod sequence;

use std::collections::HashMap;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use catalog::ActionCatalog;
pub use predicate::{Effect, Predicate};
pub use sequence::ActionSequence;

use crate::error::Error;
use crate::state::StateMap;
use crate::Result;

pub(crate) const DEFAULT_PROGRESS_NAME: &str = "default_progress";
pub(crate) const STEP_COUNT_KEY: &str = "_step_count";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Navigation,
    Manipulation,
    Perception,
    Communication,
    Wait,
    Conditional,
    Observation,
}

/// Execution status. Only moves forward: Pending -> Executing ->
/// Completed | Failed. Skipped is assigned by sequence-level logic, never
/// by the action itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    #[default]
    Pending,
    Executing,
    Completed,
    Failed,
    Skipped,
}

impl ActionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Skipped)
    }

    fn allows(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Executing)
                | (Self::Pending, Self::Skipped)
                | (Self::Executing, Self::Completed)
                | (Self::Executing, Self::Failed)
        )
    }
}

/// An operator over a state map. Precondition and effect lists are compiled
/// at construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    id: String,
    name: String,
    action_type: ActionType,
    #[serde(default)]
    parameters: HashMap<String, Value>,
    #[serde(default)]
    preconditions: Vec<Predicate>,
    #[serde(default)]
    effects: Vec<Effect>,
    duration: f64,
    success_probability: f64,
    #[serde(default)]
    status: ActionStatus,
    #[serde(default)]
    executed_at: Option<DateTime<Utc>>,
}

impl Action {
    pub fn new(
        name: impl Into<String>,
        action_type: ActionType,
        preconditions: &[&str],
        effects: &[&str],
        duration: f64,
        success_probability: f64,
    ) -> Result<Self> {
        let preconditions = preconditions
            .iter()
            .map(|p| p.parse())
            .collect::<Result<Vec<Predicate>>>()?;
        let effects = effects
            .iter()
            .map(|e| e.parse())
            .collect::<Result<Vec<Effect>>>()?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            action_type,
            parameters: HashMap::new(),
            preconditions,
            effects,
            duration,
            success_probability,
            status: ActionStatus::Pending,
            executed_at: None,
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_parameters(mut self, parameters: HashMap<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Safety-valve action injected by successor generation at dead ends.
    /// It only advances an internal step counter; consumers filter it from
    /// resulting plans by name.
    pub fn default_progress() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: DEFAULT_PROGRESS_NAME.to_owned(),
            action_type: ActionType::Wait,
            parameters: HashMap::new(),
            preconditions: Vec::new(),
            effects: vec![Effect::Add {
                key: STEP_COUNT_KEY.to_owned(),
                amount: 1.0,
            }],
            duration: 1.0,
            success_probability: 1.0,
            status: ActionStatus::Pending,
            executed_at: None,
        }
    }

    pub fn is_default_progress(&self) -> bool {
        self.name == DEFAULT_PROGRESS_NAME
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    pub fn parameters(&self) -> &HashMap<String, Value> {
        &self.parameters
    }

    pub fn preconditions(&self) -> &[Predicate] {
        &self.preconditions
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn success_probability(&self) -> f64 {
        self.success_probability
    }

    pub fn status(&self) -> ActionStatus {
        self.status
    }

    pub fn executed_at(&self) -> Option<DateTime<Utc>> {
        self.executed_at
    }

    /// True iff every precondition holds in `state`.
    pub fn can_execute(&self, state: &StateMap) -> bool {
        self.preconditions.iter().all(|p| p.holds(state))
    }

    /// Applies the effect list to a copy of `state`. The input is never
    /// mutated. Fails with a precondition violation when the action is not
    /// executable, leaving the action marked Failed.
    pub fn execute(&mut self, state: &StateMap) -> Result<StateMap> {
        self.advance(ActionStatus::Executing);

        if !self.can_execute(state) {
            self.advance(ActionStatus::Failed);
            return Err(Error::PreconditionViolation(self.name.clone()));
        }

        let mut next = state.clone();
        for effect in &self.effects {
            effect.apply(&mut next);
        }

        self.advance(ActionStatus::Completed);
        self.executed_at = Some(Utc::now());

        Ok(next)
    }

    pub(crate) fn mark_skipped(&mut self) {
        self.advance(ActionStatus::Skipped);
    }

    fn advance(&mut self, next: ActionStatus) {
        if self.status.allows(next) {
            self.status = next;
        } else {
            tracing::debug!(
                "Ignoring status transition {} -> {} for action {}",
                self.status,
                next,
                self.name
            );
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.name, self.action_type)
    }
}
