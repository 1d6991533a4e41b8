use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use super::StateMap;

/// Absolute tolerance for numeric goal comparison.
pub(crate) const NUMERIC_TOLERANCE: f64 = 0.001;

/// Keys carrying this prefix are internal reservations: a goal key absent
/// from the state is satisfied only when it is marked this way.
const RESERVED_PREFIX: char = '_';

/// Type-aware goal satisfaction test. Fail-closed: anything that cannot be
/// compared counts as not achieved.
pub fn goal_reached(state: &StateMap, goal: &StateMap) -> bool {
    goal.iter().all(|(key, expected)| match state.get(key) {
        Some(current) => values_match(current, expected),
        None => key.starts_with(RESERVED_PREFIX),
    })
}

pub(crate) fn values_match(current: &Value, expected: &Value) -> bool {
    match (current, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => (a - b).abs() <= NUMERIC_TOLERANCE,
            _ => false,
        },
        (Value::String(a), Value::String(b)) => {
            a.trim().eq_ignore_ascii_case(b.trim())
        }
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            //sequences compare as sets: order- and duplicate-insensitive
            let a: BTreeSet<String> = a.iter().map(canonical_value).collect();
            let b: BTreeSet<String> = b.iter().map(canonical_value).collect();
            a == b
        }
        (Value::Object(a), Value::Object(b)) => b.iter().all(|(key, expected)| match a.get(key) {
            Some(current) => values_match(current, expected),
            None => key.starts_with(RESERVED_PREFIX),
        }),
        (a, b) => a == b,
    }
}

/// Deterministic string form of a state map, used as the deduplication key
/// in visited/closed sets. Keys are emitted in sorted order at every level.
pub fn canonical_key(state: &StateMap) -> String {
    let ordered: BTreeMap<&String, String> = state
        .iter()
        .map(|(key, value)| (key, canonical_value(value)))
        .collect();

    let mut out = String::from("{");
    for (i, (key, value)) in ordered.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    out.push('}');
    out
}

fn canonical_value(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let ordered: BTreeMap<&String, String> = map
                .iter()
                .map(|(key, value)| (key, canonical_value(value)))
                .collect();
            let mut out = String::from("{");
            for (i, (key, value)) in ordered.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(key);
                out.push('=');
                out.push_str(value);
            }
            out.push('}');
            out
        }
        Value::Array(items) => {
            let mut out = String::from("[");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&canonical_value(item));
            }
            out.push(']');
            out
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(pairs: &[(&str, Value)]) -> StateMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn numbers_compare_with_tolerance() {
        let goal = state(&[("battery", json!(0.5))]);

        assert!(goal_reached(&state(&[("battery", json!(0.5005))]), &goal));
        assert!(!goal_reached(&state(&[("battery", json!(0.6))]), &goal));
    }

    #[test]
    fn strings_compare_case_and_whitespace_insensitively() {
        let goal = state(&[("room", json!("Kitchen"))]);

        assert!(goal_reached(&state(&[("room", json!(" kitchen "))]), &goal));
        assert!(!goal_reached(&state(&[("room", json!("hall"))]), &goal));
    }

    #[test]
    fn booleans_compare_strictly() {
        let goal = state(&[("open", json!(true))]);

        assert!(!goal_reached(&state(&[("open", json!(false))]), &goal));
        assert!(!goal_reached(&state(&[("open", json!(1))]), &goal));
    }

    #[test]
    fn sequences_compare_as_sets() {
        let goal = state(&[("visited", json!(["a", "b"]))]);

        assert!(goal_reached(
            &state(&[("visited", json!(["b", "a", "a"]))]),
            &goal
        ));
        assert!(!goal_reached(&state(&[("visited", json!(["a"]))]), &goal));
    }

    #[test]
    fn nested_maps_recurse() {
        let goal = state(&[("inventory", json!({"apple": 2}))]);

        assert!(goal_reached(
            &state(&[("inventory", json!({"apple": 2, "pear": 1}))]),
            &goal
        ));
        assert!(!goal_reached(
            &state(&[("inventory", json!({"apple": 1}))]),
            &goal
        ));
    }

    #[test]
    fn missing_goal_key_fails_unless_reserved() {
        let current = state(&[("present", json!(true))]);

        assert!(!goal_reached(&current, &state(&[("absent", json!(true))])));
        assert!(goal_reached(&current, &state(&[("_absent", json!(true))])));
    }

    #[test]
    fn canonical_key_is_insertion_order_independent() {
        let mut forward = StateMap::new();
        forward.insert("a".to_owned(), json!(1));
        forward.insert("b".to_owned(), json!({"y": 2, "x": 1}));

        let mut backward = StateMap::new();
        backward.insert("b".to_owned(), json!({"x": 1, "y": 2}));
        backward.insert("a".to_owned(), json!(1));

        assert_eq!(canonical_key(&forward), canonical_key(&backward));
        assert_ne!(
            canonical_key(&forward),
            canonical_key(&state(&[("a", json!(2))]))
        );
    }
}
