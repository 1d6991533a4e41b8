use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::state::{values_match, StateMap};
use crate::Result;

/// None of these is proven admissible; the planner is satisficing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicStrategy {
    Zero,
    GoalDistance,
    ActionCost,
    Combined,
}

#[derive(Debug, Clone)]
pub struct HeuristicCalculator {
    strategy: HeuristicStrategy,
    goal_distance_weight: f64,
    action_cost_weight: f64,
}

impl HeuristicCalculator {
    pub fn new(strategy: HeuristicStrategy) -> Self {
        Self::with_weights(strategy, 0.7, 0.3)
    }

    pub fn with_weights(
        strategy: HeuristicStrategy,
        goal_distance_weight: f64,
        action_cost_weight: f64,
    ) -> Self {
        Self {
            strategy,
            goal_distance_weight,
            action_cost_weight,
        }
    }

    pub fn strategy(&self) -> HeuristicStrategy {
        self.strategy
    }

    pub fn score(&self, state: &StateMap, goal: &StateMap, actions: &[Action]) -> Result<f64> {
        match self.strategy {
            HeuristicStrategy::Zero => Ok(0.0),
            HeuristicStrategy::GoalDistance => Ok(Self::goal_distance(state, goal)),
            HeuristicStrategy::ActionCost => self.action_cost(state, goal, actions),
            HeuristicStrategy::Combined => {
                let distance = Self::goal_distance(state, goal);
                let cost = self.action_cost(state, goal, actions)?;
                Ok(self.goal_distance_weight * distance + self.action_cost_weight * cost)
            }
        }
    }

    /// Hamming-style distance restricted to the goal's key set: the number
    /// of goal keys whose current value misses the target.
    pub fn goal_distance(state: &StateMap, goal: &StateMap) -> f64 {
        goal.iter()
            .filter(|(key, expected)| match state.get(*key) {
                Some(current) => !values_match(current, expected),
                None => !key.starts_with('_'),
            })
            .count() as f64
    }

    /// Minimum of `duration + goal_distance(result)` over every currently
    /// executable action, each one simulated on a copy. Falls back to the
    /// plain goal distance when nothing is executable.
    fn action_cost(&self, state: &StateMap, goal: &StateMap, actions: &[Action]) -> Result<f64> {
        let mut best: Option<f64> = None;

        for action in actions {
            if !action.can_execute(state) {
                continue;
            }

            let mut simulated = action.clone();
            let next = simulated.execute(state)?;
            let cost = action.duration() + Self::goal_distance(&next, goal);

            if best.map_or(true, |b| cost < b) {
                best = Some(cost);
            }
        }

        Ok(best.unwrap_or_else(|| Self::goal_distance(state, goal)))
    }
}
