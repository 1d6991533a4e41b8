use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::rc::Rc;

use super::node::PlanningNode;
use super::result::PlanningResult;
use super::{successor, SearchContext};
use crate::state::{canonical_key, StateMap};

struct FrontierEntry {
    node: Rc<PlanningNode>,
    total_cost: f64,
    insertion: u64,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.insertion == other.insertion
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    //min-heap on f = g + h; ties broken by insertion order only
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .total_cost
            .partial_cmp(&self.total_cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.insertion.cmp(&self.insertion))
    }
}

/// Priority frontier on total cost. Closed states are never reopened, so
/// with an inadmissible heuristic the returned cost is not guaranteed
/// minimal.
pub(crate) fn search(ctx: &mut SearchContext<'_>, initial: StateMap) -> PlanningResult {
    let mut frontier = BinaryHeap::new();
    let mut closed: HashSet<String> = HashSet::new();
    let mut insertion = 0u64;

    let root = PlanningNode::root(initial);
    frontier.push(FrontierEntry {
        total_cost: root.total_cost(),
        node: root,
        insertion,
    });

    while let Some(entry) = frontier.pop() {
        let node = entry.node;

        if ctx.over_time() || ctx.depth_exceeded(node.depth()) {
            return ctx.unsolved();
        }

        if !closed.insert(canonical_key(node.state())) {
            continue;
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
            if closed.contains(&canonical_key(child.state())) {
                continue;
            }
            insertion += 1;
            frontier.push(FrontierEntry {
                total_cost: child.total_cost(),
                node: child,
                insertion,
            });
        }
    }

    ctx.unsolved()
}
