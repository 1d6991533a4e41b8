use std::collections::{HashSet, VecDeque};

use super::node::PlanningNode;
use super::result::PlanningResult;
use super::{successor, SearchContext};
use crate::state::{canonical_key, StateMap};

/// FIFO frontier; the first node passing the goal test has minimal action
/// count, not minimal cost.
pub(crate) fn search(ctx: &mut SearchContext<'_>, initial: StateMap) -> PlanningResult {
    let mut frontier = VecDeque::new();
    let mut visited = HashSet::new();

    let root = PlanningNode::root(initial);
    visited.insert(canonical_key(root.state()));
    frontier.push_back(root);

    while let Some(node) = frontier.pop_front() {
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
        for child in children {
            if visited.insert(canonical_key(child.state())) {
                frontier.push_back(child);
            }
        }
    }

    ctx.unsolved()
}
