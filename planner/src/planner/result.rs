use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::PlanningStrategy;
use crate::action::ActionSequence;
use crate::state::StateMap;

/// Failure reason shared by time exhaustion, depth exhaustion and frontier
/// starvation; callers treat all three as the same ordinary outcome.
pub const NO_SOLUTION_REASON: &str = "no solution found within time/depth limits";

/// Outcome of one `plan()` call. Constructed once, immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct PlanningResult {
    pub success: bool,
    pub sequence: Option<ActionSequence>,
    pub planning_time: Duration,
    pub nodes_expanded: u64,
    pub total_cost: f64,
    pub plan_length: usize,
    pub algorithm: PlanningStrategy,
    pub reason: Option<String>,
    pub metadata: HashMap<String, Value>,
}

impl PlanningResult {
    pub(crate) fn solved(
        algorithm: PlanningStrategy,
        sequence: ActionSequence,
        planning_time: Duration,
        nodes_expanded: u64,
        total_cost: f64,
    ) -> Self {
        let plan_length = sequence.len();

        Self {
            success: true,
            sequence: Some(sequence),
            planning_time,
            nodes_expanded,
            total_cost,
            plan_length,
            algorithm,
            reason: None,
            metadata: HashMap::new(),
        }
    }

    pub(crate) fn unsolved(
        algorithm: PlanningStrategy,
        reason: impl Into<String>,
        planning_time: Duration,
        nodes_expanded: u64,
    ) -> Self {
        Self {
            success: false,
            sequence: None,
            planning_time,
            nodes_expanded,
            total_cost: f64::INFINITY,
            plan_length: 0,
            algorithm,
            reason: Some(reason.into()),
            metadata: HashMap::new(),
        }
    }

    /// Final state recorded by the search, if any.
    pub fn final_state(&self) -> Option<StateMap> {
        let object = self.metadata.get("final_state")?.as_object()?;
        Some(
            object
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }
}

pub(crate) fn state_value(state: &StateMap) -> Value {
    Value::Object(
        state
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    )
}
