use super::result::PlanningResult;
use super::SearchContext;
use crate::action::Action;
use crate::state::StateMap;

/// Strict hill-climbing: no tree, no backtracking. Each round evaluates
/// every executable action's resulting heuristic value and commits to the
/// single best one.
pub(crate) fn search(ctx: &mut SearchContext<'_>, initial: StateMap) -> PlanningResult {
    let mut current = initial;
    let mut taken: Vec<Action> = Vec::new();
    let mut total_cost = 0.0;

    loop {
        if ctx.over_time() || ctx.depth_exceeded(taken.len()) {
            return ctx.unsolved();
        }
        ctx.count_expansion();

        if ctx.goal_reached(&current) {
            return ctx.solved(taken, total_cost, &current);
        }

        let mut best: Option<(f64, Action, StateMap)> = None;
        for action in ctx.actions {
            if !action.can_execute(&current) {
                continue;
            }

            let mut applied = action.clone();
            let next = match applied.execute(&current) {
                Ok(next) => next,
                Err(e) => return ctx.failed(e),
            };
            let score = match ctx.heuristic.score(&next, ctx.goal, ctx.actions) {
                Ok(score) => score,
                Err(e) => return ctx.failed(e),
            };

            if best.as_ref().map_or(true, |(b, _, _)| score < *b) {
                best = Some((score, applied, next));
            }
        }

        match best {
            Some((_, action, next)) => {
                total_cost += action.duration();
                taken.push(action);
                current = next;
            }
            //no executable action remaining
            None => return ctx.unsolved(),
        }
    }
}
