use std::collections::HashSet;

use super::node::PlanningNode;
use super::result::PlanningResult;
use super::{successor, SearchContext};
use crate::state::{canonical_key, StateMap};

/// LIFO frontier. Successors are pushed in reverse so the first generated
/// child is explored first; the first solution found may be long and
/// non-optimal.
pub(crate) fn search(ctx: &mut SearchContext<'_>, initial: StateMap) -> PlanningResult {
    let mut frontier = Vec::new();
    let mut visited = HashSet::new();

    let root = PlanningNode::root(initial);
    visited.insert(canonical_key(root.state()));
    frontier.push(root);

    while let Some(node) = frontier.pop() {
        if ctx.over_time() || ctx.depth_exceeded(node.depth()) {
            return ctx.unsolved();
        }
        ctx.count_expansion();

        if ctx.goal_reached(node.state()) {
            return ctx.solved_from_node(&node);
        }

        let children = match successor::expand(&node, ctx) {
            Ok(children) => children,
            Err(e) => return ctx.failed(e),
        };
        for child in children.into_iter().rev() {
            if visited.insert(canonical_key(child.state())) {
                frontier.push(child);
            }
        }
    }

    ctx.unsolved()
}
