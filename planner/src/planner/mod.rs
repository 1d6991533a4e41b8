mod astar;
mod bfs;
mod dfs;
mod greedy;
mod heuristic;
mod hierarchical;
mod node;
mod result;
mod sampling;
mod successor;
mod trace;

#[cfg(test)]
mod tests;

use std::time::Instant;

use serde::{Deserialize, Serialize};

pub use heuristic::{HeuristicCalculator, HeuristicStrategy};
pub use node::PlanningNode;
pub use result::{PlanningResult, NO_SOLUTION_REASON};
pub use trace::display_planning_result;

use result::state_value;

use crate::action::{Action, ActionSequence};
use crate::error::Error;
use crate::settings::PlanningSettings;
use crate::state::{goal_reached, StateManager, StateMap, StateTransition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum PlanningStrategy {
    Bfs,
    Dfs,
    AStar,
    Greedy,
    Hierarchical,
    Sampling,
}

/// Orchestrates the search strategies over a state store. One instance per
/// logical planning thread; nothing is shared between instances.
#[derive(Debug, Clone)]
pub struct ActionPlanner {
    strategy: PlanningStrategy,
    heuristic: HeuristicCalculator,
    settings: PlanningSettings,
    state_manager: StateManager,
}

impl ActionPlanner {
    pub fn new(strategy: PlanningStrategy) -> Self {
        Self::with_settings(strategy, PlanningSettings::default())
    }

    pub fn with_settings(strategy: PlanningStrategy, settings: PlanningSettings) -> Self {
        let heuristic = HeuristicCalculator::with_weights(
            HeuristicStrategy::GoalDistance,
            settings.goal_distance_weight,
            settings.action_cost_weight,
        );

        Self {
            strategy,
            heuristic,
            settings,
            state_manager: StateManager::new(),
        }
    }

    pub fn with_heuristic(mut self, heuristic: HeuristicCalculator) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn strategy(&self) -> PlanningStrategy {
        self.strategy
    }

    pub fn state_manager(&self) -> &StateManager {
        &self.state_manager
    }

    pub fn state_manager_mut(&mut self) -> &mut StateManager {
        &mut self.state_manager
    }

    /// Searches for an action sequence from `initial_state` to a state
    /// satisfying `goal_state`. Budget exhaustion and unsolvable requests
    /// are ordinary unsuccessful results, never errors.
    #[tracing::instrument(skip_all, fields(strategy = %self.strategy))]
    pub fn plan(
        &mut self,
        initial_state: &StateMap,
        goal_state: &StateMap,
        available_actions: &[Action],
        state_transitions: Option<&[StateTransition]>,
    ) -> PlanningResult {
        let started = Instant::now();
        tracing::info!("Start planning");

        if initial_state.is_empty() || goal_state.is_empty() || available_actions.is_empty() {
            tracing::warn!("Rejecting planning request with empty state or action list");
            return PlanningResult::unsolved(
                self.strategy,
                Error::InvalidRequest.to_string(),
                started.elapsed(),
                0,
            );
        }

        self.state_manager.reset();
        self.state_manager.load_state(initial_state.clone());
        if let Some(transitions) = state_transitions {
            for transition in transitions {
                self.state_manager.register_transition(transition.clone());
            }
        }

        let mut ctx = SearchContext {
            strategy: self.strategy,
            initial: initial_state,
            goal: goal_state,
            actions: available_actions,
            heuristic: &self.heuristic,
            started,
            deadline: started + self.settings.time_budget(),
            max_depth: self.settings.max_depth,
            nodes_expanded: 0,
        };

        let result = match self.strategy {
            PlanningStrategy::Bfs => bfs::search(&mut ctx, initial_state.clone()),
            PlanningStrategy::Dfs => dfs::search(&mut ctx, initial_state.clone()),
            PlanningStrategy::AStar => astar::search(&mut ctx, initial_state.clone()),
            PlanningStrategy::Greedy => greedy::search(&mut ctx, initial_state.clone()),
            PlanningStrategy::Hierarchical => hierarchical::search(&mut ctx, initial_state.clone()),
            PlanningStrategy::Sampling => {
                sampling::search(&mut ctx, initial_state.clone(), &self.settings.sampling)
            }
        };

        tracing::info!(
            success = result.success,
            nodes_expanded = result.nodes_expanded,
            plan_length = result.plan_length,
            "Planning done"
        );

        result
    }
}

/// Per-call search state shared by the strategy implementations.
pub(crate) struct SearchContext<'a> {
    pub(crate) strategy: PlanningStrategy,
    pub(crate) initial: &'a StateMap,
    pub(crate) goal: &'a StateMap,
    pub(crate) actions: &'a [Action],
    pub(crate) heuristic: &'a HeuristicCalculator,
    pub(crate) started: Instant,
    pub(crate) deadline: Instant,
    pub(crate) max_depth: usize,
    pub(crate) nodes_expanded: u64,
}

impl SearchContext<'_> {
    pub(crate) fn over_time(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub(crate) fn depth_exceeded(&self, depth: usize) -> bool {
        depth > self.max_depth
    }

    pub(crate) fn count_expansion(&mut self) {
        self.nodes_expanded += 1;
    }

    pub(crate) fn goal_reached(&self, state: &StateMap) -> bool {
        goal_reached(state, self.goal)
    }

    pub(crate) fn solved(
        &self,
        actions: Vec<Action>,
        total_cost: f64,
        final_state: &StateMap,
    ) -> PlanningResult {
        let sequence = ActionSequence::new(actions, self.initial.clone(), self.goal.clone());
        let mut result = PlanningResult::solved(
            self.strategy,
            sequence,
            self.started.elapsed(),
            self.nodes_expanded,
            total_cost,
        );
        result
            .metadata
            .insert("final_state".to_owned(), state_value(final_state));
        result
    }

    pub(crate) fn solved_from_node(&self, node: &PlanningNode) -> PlanningResult {
        self.solved(node.path(), node.path_cost(), node.state())
    }

    pub(crate) fn unsolved(&self) -> PlanningResult {
        PlanningResult::unsolved(
            self.strategy,
            NO_SOLUTION_REASON,
            self.started.elapsed(),
            self.nodes_expanded,
        )
    }

    pub(crate) fn failed(&self, error: Error) -> PlanningResult {
        tracing::error!("Error during planning: {:?}", error);
        PlanningResult::unsolved(
            self.strategy,
            error.to_string(),
            self.started.elapsed(),
            self.nodes_expanded,
        )
    }
}
