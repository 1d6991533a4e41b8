use std::collections::BTreeMap;

use serde_json::Value;

use super::result::PlanningResult;
use super::{astar, PlanningStrategy, SearchContext};
use crate::action::Action;
use crate::error::Error;
use crate::state::{StateMap, ENTITY_HINTS, LOCATION_HINTS};

/// Splits the goal into ordered subgoal groups and solves each with A*,
/// chaining the end state of one group into the next. Any subgoal failure
/// aborts the whole plan.
pub(crate) fn search(ctx: &mut SearchContext<'_>, initial: StateMap) -> PlanningResult {
    let groups = partition_goal(ctx.goal);
    tracing::debug!("Planning {} subgoal groups", groups.len());

    let mut current = initial;
    let mut actions: Vec<Action> = Vec::new();
    let mut total_cost = 0.0;

    for (index, group) in groups.iter().enumerate() {
        let mut sub_ctx = SearchContext {
            strategy: PlanningStrategy::AStar,
            initial: &current,
            goal: group,
            actions: ctx.actions,
            heuristic: ctx.heuristic,
            started: ctx.started,
            deadline: ctx.deadline,
            max_depth: ctx.max_depth,
            nodes_expanded: 0,
        };

        let sub = astar::search(&mut sub_ctx, current.clone());
        ctx.nodes_expanded += sub.nodes_expanded;

        if !sub.success {
            tracing::debug!("Subgoal {}/{} failed, aborting plan", index + 1, groups.len());
            let mut result = ctx.unsolved();
            result
                .metadata
                .insert("failed_subgoal".to_owned(), subgoal_value(group));
            return result;
        }

        let final_state = match sub.final_state() {
            Some(state) => state,
            None => {
                return ctx.failed(Error::Internal(anyhow::anyhow!(
                    "subgoal result carries no final state"
                )))
            }
        };
        if let Some(sequence) = sub.sequence {
            actions.extend(sequence.actions().iter().cloned());
        }
        total_cost += sub.total_cost;
        current = final_state;
    }

    let mut result = ctx.solved(actions, total_cost, &current);
    result.metadata.insert(
        "subgoal_groups".to_owned(),
        Value::Array(groups.iter().map(subgoal_value).collect()),
    );
    result
}

/// Fixed priority taxonomy: location-like keys, then object/entity-like
/// keys, then boolean-valued keys, then the remainder. When none of the
/// taxonomy buckets populate, the goal is chunked two keys at a time.
pub(crate) fn partition_goal(goal: &StateMap) -> Vec<StateMap> {
    let mut location = StateMap::new();
    let mut entity = StateMap::new();
    let mut boolean = StateMap::new();
    let mut remainder = StateMap::new();

    let ordered: BTreeMap<&String, &Value> = goal.iter().collect();

    for (key, value) in &ordered {
        let lowered = key.to_lowercase();

        if LOCATION_HINTS.iter().any(|hint| lowered.contains(hint)) {
            location.insert((*key).clone(), (*value).clone());
        } else if ENTITY_HINTS.iter().any(|hint| lowered.contains(hint)) {
            entity.insert((*key).clone(), (*value).clone());
        } else if value.is_boolean() {
            boolean.insert((*key).clone(), (*value).clone());
        } else {
            remainder.insert((*key).clone(), (*value).clone());
        }
    }

    if location.is_empty() && entity.is_empty() && boolean.is_empty() {
        let mut groups = Vec::new();
        let mut chunk = StateMap::new();
        for (key, value) in ordered {
            chunk.insert(key.clone(), value.clone());
            if chunk.len() == 2 {
                groups.push(std::mem::take(&mut chunk));
            }
        }
        if !chunk.is_empty() {
            groups.push(chunk);
        }
        return groups;
    }

    [location, entity, boolean, remainder]
        .into_iter()
        .filter(|group| !group.is_empty())
        .collect()
}

fn subgoal_value(group: &StateMap) -> Value {
    Value::Object(
        group
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    )
}
