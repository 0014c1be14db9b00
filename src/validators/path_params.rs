//! Path parameter validation.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::clients::{Constraint, ValidationError, ValidationField};
use crate::validators::url::UrlTemplate;

/// Validates path parameters against a URL template.
///
/// Keys must match the template's placeholders exactly. Values must be
/// non-empty strings, numbers or booleans; they come back stringified.
///
/// # Errors
///
/// Returns a [`ValidationError`] on [`ValidationField::PathParams`] naming
/// the first missing key, then the first extra key, then the first bad value.
pub fn parse_path_params(
    url: &UrlTemplate,
    params: &BTreeMap<String, Value>,
) -> Result<BTreeMap<String, String>, ValidationError> {
    let fail = |constraint, key: &str, value: String| {
        ValidationError::new(ValidationField::PathParams, constraint, value).with_key(key)
    };

    if let Some(missing) = url
        .placeholders
        .iter()
        .find(|name| !params.contains_key(name.as_str()))
    {
        return Err(fail(Constraint::MissingKey, missing, String::new()));
    }

    if let Some((extra, value)) = params
        .iter()
        .find(|(key, _)| !url.placeholders.contains(key.as_str()))
    {
        return Err(fail(Constraint::ExtraKey, extra, value.to_string()));
    }

    params
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => {
                    return Err(fail(Constraint::NotStringifiable, key, value.to_string()));
                }
            };
            if rendered.is_empty() {
                return Err(fail(Constraint::Empty, key, rendered));
            }
            Ok((key.clone(), rendered))
        })
        .collect()
}
