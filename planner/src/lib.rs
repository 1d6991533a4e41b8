//! Symbolic action sequencing for embodied agents: search for an ordered
//! action sequence that turns an initial world state into one satisfying a
//! goal state, within time and depth budgets. The planner is satisficing,
//! not optimal - none of the built-in heuristics is proven admissible.

mod action;
mod error;
mod planner;
mod settings;
mod state;

pub use action::{Action, ActionCatalog, ActionSequence, ActionStatus, ActionType, Effect, Predicate};
pub use error::{Error, Result};
pub use planner::{
    display_planning_result, ActionPlanner, HeuristicCalculator, HeuristicStrategy, PlanningNode,
    PlanningResult, PlanningStrategy, NO_SOLUTION_REASON,
};
pub use settings::{PlanningSettings, SamplingSettings};
pub use state::{
    canonical_key, goal_reached, EnvironmentState, StateManager, StateMap, StateTransition,
    StateVariable, VariableType,
};
