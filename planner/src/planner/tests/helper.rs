use serde_json::Value;

use crate::action::{Action, ActionType};
use crate::planner::{ActionPlanner, PlanningStrategy};
use crate::settings::{PlanningSettings, SamplingSettings};
use crate::state::StateMap;

pub fn state(pairs: &[(&str, Value)]) -> StateMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub fn action(name: &str, preconditions: &[&str], effects: &[&str], duration: f64) -> Action {
    Action::new(
        name,
        ActionType::Manipulation,
        preconditions,
        effects,
        duration,
        0.95,
    )
    .unwrap()
}

/// Planner with tight, deterministic budgets: one second, depth 8, seeded
/// sampling.
pub fn planner(strategy: PlanningStrategy) -> ActionPlanner {
    init_tracing();
    planner_with_budget(strategy, 1000)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn planner_with_budget(strategy: PlanningStrategy, time_budget_ms: u64) -> ActionPlanner {
    let settings = PlanningSettings {
        time_budget_ms,
        max_depth: 8,
        sampling: SamplingSettings {
            iterations: 50,
            max_rollout_length: 10,
            seed: Some(7),
        },
        ..PlanningSettings::default()
    };

    ActionPlanner::with_settings(strategy, settings)
}

pub fn open_door() -> Action {
    action("open_door", &["door_closed"], &["door_closed=false"], 1.5)
}

pub fn door_closed() -> StateMap {
    state(&[("door_closed", Value::Bool(true))])
}

pub fn door_open_goal() -> StateMap {
    state(&[("door_closed", Value::Bool(false))])
}
