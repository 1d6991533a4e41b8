use std::rc::Rc;

use crate::action::Action;
use crate::state::StateMap;

/// Search-tree node. Children reference their parent, never the other way
/// around, so the tree is acyclic by construction; cycle avoidance across
/// states is the visited set's job.
#[derive(Debug)]
pub struct PlanningNode {
    state: Rc<StateMap>,
    action: Option<Action>,
    path_cost: f64,
    heuristic: f64,
    depth: usize,
    parent: Option<Rc<PlanningNode>>,
}

impl PlanningNode {
    pub fn root(state: StateMap) -> Rc<Self> {
        Rc::new(Self {
            state: Rc::new(state),
            action: None,
            path_cost: 0.0,
            heuristic: 0.0,
            depth: 0,
            parent: None,
        })
    }

    pub fn child(parent: &Rc<Self>, action: Action, state: StateMap, heuristic: f64) -> Rc<Self> {
        Rc::new(Self {
            state: Rc::new(state),
            path_cost: parent.path_cost + action.duration(),
            heuristic,
            depth: parent.depth + 1,
            action: Some(action),
            parent: Some(Rc::clone(parent)),
        })
    }

    pub fn state(&self) -> &StateMap {
        &self.state
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn path_cost(&self) -> f64 {
        self.path_cost
    }

    pub fn heuristic(&self) -> f64 {
        self.heuristic
    }

    pub fn total_cost(&self) -> f64 {
        self.path_cost + self.heuristic
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Actions from the root to this node, reconstructed through the parent
    /// chain.
    pub fn path(&self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(self.depth);
        let mut current = self;

        loop {
            if let Some(action) = &current.action {
                actions.push(action.clone());
            }
            match &current.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }

        actions.reverse();
        actions
    }
}
