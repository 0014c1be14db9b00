//! Response body validation.

use serde_json::Value;

use crate::clients::{Constraint, DataType, RawResponse, ResponseType, ValidationError, ValidationField};

/// Longest excerpt of an undecodable body kept in the error.
const MAX_EXCERPT_CHARS: usize = 200;

/// Decodes a response body according to `response_type`.
///
/// Empty bodies decode to `null`. With [`ResponseType::Auto`] the body is
/// decoded as JSON when the `Content-Type` header names JSON, and as text
/// otherwise.
///
/// # Errors
///
/// Returns a [`ValidationError`] on [`ValidationField::ResponseBody`] if the
/// body is not valid JSON (when JSON is expected) or not valid UTF-8.
pub fn parse_response_body(
    raw: &RawResponse,
    response_type: ResponseType,
) -> Result<Value, ValidationError> {
    if raw.body.is_empty() {
        return Ok(Value::Null);
    }

    let is_json = match response_type {
        ResponseType::Json => true,
        ResponseType::Text => false,
        ResponseType::Auto => raw
            .header("content-type")
            .and_then(DataType::from_content_type)
            == Some(DataType::Json),
    };

    if is_json {
        serde_json::from_slice(&raw.body).map_err(|_| undecodable(raw, "application/json"))
    } else {
        std::str::from_utf8(&raw.body)
            .map(|text| Value::String(text.to_string()))
            .map_err(|_| undecodable(raw, "text/plain"))
    }
}

fn undecodable(raw: &RawResponse, content_type: &str) -> ValidationError {
    let excerpt: String = raw.text_lossy().chars().take(MAX_EXCERPT_CHARS).collect();
    ValidationError::new(
        ValidationField::ResponseBody,
        Constraint::Undecodable {
            content_type: content_type.to_string(),
        },
        excerpt,
    )
}
