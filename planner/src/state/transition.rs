use serde::{Deserialize, Serialize};

use super::{compare, StateMap};
use crate::action::{Effect, Predicate};
use crate::Result;

/// Template describing how an action changes the committed state: a
/// from-state pattern plus preconditions that must hold, and a to-state map
/// plus effects applied on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    pub action_name: String,
    #[serde(default)]
    pub from_state: StateMap,
    pub to_state: StateMap,
    #[serde(default)]
    pub preconditions: Vec<Predicate>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    pub probability: f64,
    pub cost: f64,
}

impl StateTransition {
    pub fn new(
        action_name: impl Into<String>,
        from_state: StateMap,
        to_state: StateMap,
        preconditions: &[&str],
        effects: &[&str],
        probability: f64,
        cost: f64,
    ) -> Result<Self> {
        let preconditions = preconditions
            .iter()
            .map(|p| p.parse())
            .collect::<Result<Vec<Predicate>>>()?;
        let effects = effects
            .iter()
            .map(|e| e.parse())
            .collect::<Result<Vec<Effect>>>()?;

        Ok(Self {
            action_name: action_name.into(),
            from_state,
            to_state,
            preconditions,
            effects,
            probability,
            cost,
        })
    }

    /// True when the from-state pattern is contained in `state` and every
    /// precondition holds.
    pub fn matches(&self, state: &StateMap) -> bool {
        let pattern_holds = self.from_state.iter().all(|(key, expected)| {
            state
                .get(key)
                .is_some_and(|current| compare::values_match(current, expected))
        });

        pattern_holds && self.preconditions.iter().all(|p| p.holds(state))
    }

    /// Resulting key/value updates: the to-state map merged with the effect
    /// list applied on top of `state`.
    pub fn apply(&self, state: &StateMap) -> StateMap {
        let mut updated = state.clone();

        for (key, value) in &self.to_state {
            updated.insert(key.clone(), value.clone());
        }
        for effect in &self.effects {
            effect.apply(&mut updated);
        }

        //only hand back what actually changed
        updated
            .into_iter()
            .filter(|(key, value)| state.get(key) != Some(value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn matches_requires_pattern_and_preconditions() {
        let transition = StateTransition::new(
            "dock",
            StateMap::from([("station_visible".to_owned(), json!(true))]),
            StateMap::from([("docked".to_owned(), json!(true))]),
            &["battery<20"],
            &[],
            0.9,
            2.0,
        )
        .unwrap();

        let mut state = StateMap::from([
            ("station_visible".to_owned(), json!(true)),
            ("battery".to_owned(), json!(10)),
        ]);
        assert!(transition.matches(&state));

        state.insert("battery".to_owned(), json!(80));
        assert!(!transition.matches(&state));

        state.insert("battery".to_owned(), json!(10));
        state.insert("station_visible".to_owned(), json!(false));
        assert!(!transition.matches(&state));
    }

    #[test]
    fn apply_merges_target_and_effects() {
        let transition = StateTransition::new(
            "dock",
            StateMap::new(),
            StateMap::from([("docked".to_owned(), json!(true))]),
            &[],
            &["dock_count+=1"],
            1.0,
            1.0,
        )
        .unwrap();

        let state = StateMap::from([("docked".to_owned(), json!(false))]);
        let changes = transition.apply(&state);

        assert_eq!(changes.get("docked"), Some(&json!(true)));
        assert_eq!(changes.get("dock_count"), Some(&json!(1.0)));
        assert_eq!(changes.len(), 2);
    }
}
