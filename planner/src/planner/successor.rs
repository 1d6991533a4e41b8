use std::rc::Rc;

use super::node::PlanningNode;
use super::SearchContext;
use crate::action::Action;
use crate::Result;

/// Children of `node`: one per action whose preconditions hold, each scored
/// by the heuristic. Inapplicable actions are skipped; execution or scoring
/// errors abort the expansion and surface to the caller. A dead end at
/// non-terminal depth yields a single synthetic default-progress child so
/// the frontier never starves; consumers filter it from plans by name.
pub(crate) fn expand(
    node: &Rc<PlanningNode>,
    ctx: &SearchContext<'_>,
) -> Result<Vec<Rc<PlanningNode>>> {
    let mut children = Vec::new();

    for action in ctx.actions {
        if !action.can_execute(node.state()) {
            continue;
        }

        let mut applied = action.clone();
        let next = applied.execute(node.state())?;
        let heuristic = ctx.heuristic.score(&next, ctx.goal, ctx.actions)?;
        children.push(PlanningNode::child(node, applied, next, heuristic));
    }

    if children.is_empty() && node.depth() < ctx.max_depth {
        let mut fallback = Action::default_progress();
        tracing::trace!(
            "Dead end at depth {}, injecting {}",
            node.depth(),
            fallback.name()
        );
        let next = fallback.execute(node.state())?;
        let heuristic = ctx.heuristic.score(&next, ctx.goal, ctx.actions)?;
        children.push(PlanningNode::child(node, fallback, next, heuristic));
    }

    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionType;
    use crate::planner::heuristic::{HeuristicCalculator, HeuristicStrategy};
    use crate::planner::PlanningStrategy;
    use crate::state::StateMap;
    use serde_json::json;
    use std::time::{Duration, Instant};

    fn ctx<'a>(
        goal: &'a StateMap,
        actions: &'a [Action],
        heuristic: &'a HeuristicCalculator,
        initial: &'a StateMap,
    ) -> SearchContext<'a> {
        let started = Instant::now();
        SearchContext {
            strategy: PlanningStrategy::Bfs,
            initial,
            goal,
            actions,
            heuristic,
            started,
            deadline: started + Duration::from_secs(1),
            max_depth: 5,
            nodes_expanded: 0,
        }
    }

    #[test]
    fn expands_only_applicable_actions() {
        let initial = StateMap::from([("door_closed".to_owned(), json!(true))]);
        let goal = StateMap::from([("door_open".to_owned(), json!(true))]);
        let actions = vec![
            Action::new(
                "open_door",
                ActionType::Manipulation,
                &["door_closed"],
                &["door_closed=false", "door_open=true"],
                1.0,
                0.95,
            )
            .unwrap(),
            Action::new(
                "walk_through",
                ActionType::Navigation,
                &["door_open"],
                &["through=true"],
                1.0,
                0.95,
            )
            .unwrap(),
        ];
        let heuristic = HeuristicCalculator::new(HeuristicStrategy::GoalDistance);

        let ctx = ctx(&goal, &actions, &heuristic, &initial);
        let root = PlanningNode::root(initial.clone());
        let children = expand(&root, &ctx).unwrap();

        assert_eq!(children.len(), 1);
        assert_eq!(children[0].action().unwrap().name(), "open_door");
        assert_eq!(children[0].heuristic(), 0.0);
    }

    #[test]
    fn dead_end_injects_default_progress() {
        let initial = StateMap::from([("stuck".to_owned(), json!(true))]);
        let goal = StateMap::from([("free".to_owned(), json!(true))]);
        let actions = vec![Action::new(
            "escape",
            ActionType::Navigation,
            &["door_open"],
            &["free=true"],
            1.0,
            0.95,
        )
        .unwrap()];
        let heuristic = HeuristicCalculator::new(HeuristicStrategy::GoalDistance);

        let ctx = ctx(&goal, &actions, &heuristic, &initial);
        let root = PlanningNode::root(initial.clone());
        let children = expand(&root, &ctx).unwrap();

        assert_eq!(children.len(), 1);
        assert!(children[0].action().unwrap().is_default_progress());
        assert_eq!(children[0].state().get("_step_count"), Some(&json!(1.0)));
    }
}
