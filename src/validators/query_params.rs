//! Query parameter validation.

use std::collections::HashSet;

use serde_json::Value;

use crate::clients::{Constraint, ValidationError, ValidationField};

/// A normalized query parameter value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryValue {
    /// A single stringified scalar.
    Single(String),
    /// A list of stringified scalars, sent as repeated keys.
    Many(Vec<String>),
}

impl QueryValue {
    /// Converts back to the JSON form accepted on a [`crate::RequestSpec`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Single(s) => Value::String(s.clone()),
            Self::Many(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        }
    }
}

/// Validates query parameters.
///
/// Scalars are stringified, arrays of scalars become [`QueryValue::Many`],
/// and `null` values (top-level or inside arrays) are dropped.
///
/// # Errors
///
/// Returns a [`ValidationError`] on [`ValidationField::QueryParams`] if a key
/// is empty or repeated, or a value nests objects or arrays.
pub fn parse_query_params(
    params: &[(String, Value)],
) -> Result<Vec<(String, QueryValue)>, ValidationError> {
    let fail = |constraint, key: &str, value: &Value| {
        ValidationError::new(ValidationField::QueryParams, constraint, value.to_string())
            .with_key(key)
    };

    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(params.len());

    for (key, value) in params {
        if key.is_empty() {
            return Err(fail(Constraint::Empty, key, value));
        }
        if !seen.insert(key.as_str()) {
            return Err(fail(Constraint::DuplicateKey, key, value));
        }

        let normalized_value = match value {
            Value::Null => continue,
            Value::Array(items) => {
                let mut strings = Vec::with_capacity(items.len());
                for item in items {
                    match scalar_to_string(item) {
                        Some(Some(s)) => strings.push(s),
                        Some(None) => {}
                        None => return Err(fail(Constraint::NestedValue, key, value)),
                    }
                }
                QueryValue::Many(strings)
            }
            Value::Object(_) => return Err(fail(Constraint::NestedValue, key, value)),
            scalar => match scalar_to_string(scalar) {
                Some(Some(s)) => QueryValue::Single(s),
                _ => return Err(fail(Constraint::NestedValue, key, value)),
            },
        };
        normalized.push((key.clone(), normalized_value));
    }

    Ok(normalized)
}

/// `Some(Some(_))` for scalars, `Some(None)` for null, `None` for containers.
fn scalar_to_string(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        Value::Number(n) => Some(Some(n.to_string())),
        Value::Bool(b) => Some(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => None,
    }
}
