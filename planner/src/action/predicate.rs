use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::state::StateMap;

/// Boolean condition over a single state key, compiled once at action
/// construction. Evaluation is fail-closed: anything that cannot be
/// compared evaluates to false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Predicate {
    NotEquals { key: String, value: String },
    GreaterThan { key: String, value: f64 },
    LessThan { key: String, value: f64 },
    Equals { key: String, value: String },
    Truthy { key: String },
}

/// State mutation in assignment form, compiled like [`Predicate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Effect {
    Add { key: String, amount: f64 },
    Subtract { key: String, amount: f64 },
    Assign { key: String, value: Value },
}

impl Predicate {
    pub fn key(&self) -> &str {
        match self {
            Predicate::NotEquals { key, .. }
            | Predicate::GreaterThan { key, .. }
            | Predicate::LessThan { key, .. }
            | Predicate::Equals { key, .. }
            | Predicate::Truthy { key } => key,
        }
    }

    pub fn holds(&self, state: &StateMap) -> bool {
        match self {
            Predicate::NotEquals { key, value } => match state.get(key) {
                Some(current) => comparable_string(current) != value.as_str(),
                None => true,
            },
            Predicate::GreaterThan { key, value } => match numeric_value(state.get(key)) {
                Some(current) => current > *value,
                None => false,
            },
            Predicate::LessThan { key, value } => match numeric_value(state.get(key)) {
                Some(current) => current < *value,
                None => false,
            },
            Predicate::Equals { key, value } => match state.get(key) {
                Some(current) => comparable_string(current) == value.as_str(),
                None => false,
            },
            Predicate::Truthy { key } => truthy(state.get(key)),
        }
    }
}

impl Effect {
    pub fn key(&self) -> &str {
        match self {
            Effect::Add { key, .. } | Effect::Subtract { key, .. } | Effect::Assign { key, .. } => {
                key
            }
        }
    }

    /// Applies the effect in place. A value that cannot be coerced for a
    /// numeric update leaves the state untouched.
    pub fn apply(&self, state: &mut StateMap) {
        match self {
            Effect::Add { key, amount } => increment(state, key, *amount),
            Effect::Subtract { key, amount } => increment(state, key, -amount),
            Effect::Assign { key, value } => {
                state.insert(key.clone(), value.clone());
            }
        }
    }
}

fn increment(state: &mut StateMap, key: &str, amount: f64) {
    let current = match numeric_value(state.get(key)) {
        Some(current) => current,
        None => {
            tracing::debug!("Skipping numeric effect on non-numeric key '{}'", key);
            return;
        }
    };

    match serde_json::Number::from_f64(current + amount) {
        Some(n) => {
            state.insert(key.to_owned(), Value::Number(n));
        }
        None => tracing::debug!("Skipping numeric effect on '{}': result not finite", key),
    }
}

/// Numeric view of a state value. Missing keys default to 0, booleans count
/// as 0/1, numeric strings are parsed; everything else has no numeric view.
pub(crate) fn numeric_value(value: Option<&Value>) -> Option<f64> {
    match value {
        None => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    }
}

pub(crate) fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

fn comparable_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_owned(),
        other => other.to_string(),
    }
}

fn split_once_checked<'a>(
    input: &'a str,
    operator: &str,
) -> Option<crate::Result<(&'a str, &'a str)>> {
    let (key, value) = input.split_once(operator)?;
    let (key, value) = (key.trim(), value.trim());

    if key.is_empty() {
        return Some(Err(Error::malformed(input, "empty key")));
    }
    if value.is_empty() {
        return Some(Err(Error::malformed(input, "empty value")));
    }

    Some(Ok((key, value)))
}

fn parse_number(input: &str, raw: &str) -> crate::Result<f64> {
    let number: f64 = raw
        .parse()
        .map_err(|_| Error::malformed(input, "expected a numeric operand"))?;

    if !number.is_finite() {
        return Err(Error::malformed(input, "numeric operand must be finite"));
    }

    Ok(number)
}

fn parse_key(input: &str) -> crate::Result<String> {
    let key = input.trim();

    if key.is_empty() {
        return Err(Error::malformed(input, "empty predicate"));
    }
    if key.contains(['=', '<', '>', '!', '+', '-']) {
        return Err(Error::malformed(input, "operator in unexpected position"));
    }

    Ok(key.to_owned())
}

impl FromStr for Predicate {
    type Err = Error;

    //operator checks are ordered so that `!=` never parses as `=`
    fn from_str(input: &str) -> crate::Result<Self> {
        if let Some(parts) = split_once_checked(input, "!=") {
            let (key, value) = parts?;
            return Ok(Predicate::NotEquals {
                key: key.to_owned(),
                value: value.to_owned(),
            });
        }

        if let Some(parts) = split_once_checked(input, ">") {
            let (key, value) = parts?;
            return Ok(Predicate::GreaterThan {
                key: key.to_owned(),
                value: parse_number(input, value)?,
            });
        }

        if let Some(parts) = split_once_checked(input, "<") {
            let (key, value) = parts?;
            return Ok(Predicate::LessThan {
                key: key.to_owned(),
                value: parse_number(input, value)?,
            });
        }

        if let Some(parts) = split_once_checked(input, "=") {
            let (key, value) = parts?;
            return Ok(Predicate::Equals {
                key: key.to_owned(),
                value: value.to_owned(),
            });
        }

        Ok(Predicate::Truthy {
            key: parse_key(input)?,
        })
    }
}

impl FromStr for Effect {
    type Err = Error;

    fn from_str(input: &str) -> crate::Result<Self> {
        if let Some(parts) = split_once_checked(input, "+=") {
            let (key, value) = parts?;
            return Ok(Effect::Add {
                key: key.to_owned(),
                amount: parse_number(input, value)?,
            });
        }

        if let Some(parts) = split_once_checked(input, "-=") {
            let (key, value) = parts?;
            return Ok(Effect::Subtract {
                key: key.to_owned(),
                amount: parse_number(input, value)?,
            });
        }

        if let Some(parts) = split_once_checked(input, "=") {
            let (key, value) = parts?;
            if key.contains(['!', '<', '>']) {
                return Err(Error::malformed(input, "comparison used as effect"));
            }
            return Ok(Effect::Assign {
                key: key.to_owned(),
                value: parse_assigned_value(value),
            });
        }

        Err(Error::malformed(input, "effect must be an assignment"))
    }
}

fn parse_assigned_value(raw: &str) -> Value {
    if raw == "true" {
        return Value::Bool(true);
    }
    if raw == "false" {
        return Value::Bool(false);
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = raw.parse::<f64>() {
        if float.is_finite() {
            return Value::from(float);
        }
    }

    Value::String(raw.to_owned())
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::NotEquals { key, value } => write!(f, "{key}!={value}"),
            Predicate::GreaterThan { key, value } => write!(f, "{key}>{value}"),
            Predicate::LessThan { key, value } => write!(f, "{key}<{value}"),
            Predicate::Equals { key, value } => write!(f, "{key}={value}"),
            Predicate::Truthy { key } => write!(f, "{key}"),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Add { key, amount } => write!(f, "{key}+={amount}"),
            Effect::Subtract { key, amount } => write!(f, "{key}-={amount}"),
            Effect::Assign { key, value } => match value {
                Value::String(s) => write!(f, "{key}={s}"),
                other => write!(f, "{key}={other}"),
            },
        }
    }
}

impl TryFrom<String> for Predicate {
    type Error = Error;

    fn try_from(input: String) -> crate::Result<Self> {
        input.parse()
    }
}

impl From<Predicate> for String {
    fn from(predicate: Predicate) -> Self {
        predicate.to_string()
    }
}

impl TryFrom<String> for Effect {
    type Error = Error;

    fn try_from(input: String) -> crate::Result<Self> {
        input.parse()
    }
}

impl From<Effect> for String {
    fn from(effect: Effect) -> Self {
        effect.to_string()
    }
}
