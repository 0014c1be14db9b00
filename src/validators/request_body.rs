//! Request body validation and encoding.

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::{Constraint, DataType, ValidationError, ValidationField};

/// A request body encoded for the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedBody {
    /// The `Content-Type` the body was encoded as.
    pub content_type: String,
    /// The encoded body.
    pub content: String,
}

/// Validates and encodes a request body.
///
/// The body is encoded as `body_type`, or JSON when unset. An explicit
/// `Content-Type` header among `headers` must agree with `body_type`; a header
/// naming a type this crate does not encode is accepted only for string
/// bodies, which are then sent verbatim.
///
/// Returns `Ok(None)` when there is no body.
///
/// # Errors
///
/// Returns a [`ValidationError`] on [`ValidationField::RequestBody`] if the
/// header and body type disagree or the body's shape cannot be encoded.
pub fn parse_request_body(
    body: Option<&Value>,
    body_type: Option<DataType>,
    headers: &HashMap<String, String>,
) -> Result<Option<EncodedBody>, ValidationError> {
    let Some(body) = body else {
        return Ok(None);
    };

    let header = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.as_str());

    let data_type = match (header, body_type) {
        (Some(header), declared) => match (DataType::from_content_type(header), declared) {
            (Some(from_header), Some(declared)) if from_header != declared => {
                return Err(ValidationError::new(
                    ValidationField::RequestBody,
                    Constraint::ContentTypeMismatch {
                        header: header.to_string(),
                        body_type: declared.as_content_type().to_string(),
                    },
                    body.to_string(),
                ));
            }
            (Some(from_header), _) => from_header,
            (None, Some(declared)) => {
                return Err(ValidationError::new(
                    ValidationField::RequestBody,
                    Constraint::ContentTypeMismatch {
                        header: header.to_string(),
                        body_type: declared.as_content_type().to_string(),
                    },
                    body.to_string(),
                ));
            }
            (None, None) => {
                return encode_verbatim(body, header).map(Some);
            }
        },
        (None, declared) => declared.unwrap_or(DataType::Json),
    };

    encode(body, data_type).map(Some)
}

fn unencodable(content_type: &str, body: &Value) -> ValidationError {
    ValidationError::new(
        ValidationField::RequestBody,
        Constraint::Unencodable {
            content_type: content_type.to_string(),
        },
        body.to_string(),
    )
}

fn encode_verbatim(body: &Value, content_type: &str) -> Result<EncodedBody, ValidationError> {
    match body {
        Value::String(s) => Ok(EncodedBody {
            content_type: content_type.to_string(),
            content: s.clone(),
        }),
        _ => Err(unencodable(content_type, body)),
    }
}

fn encode(body: &Value, data_type: DataType) -> Result<EncodedBody, ValidationError> {
    let content_type = data_type.as_content_type();
    let content = match data_type {
        DataType::Json => body.to_string(),
        DataType::Text => match body {
            Value::String(s) => s.clone(),
            _ => return Err(unencodable(content_type, body)),
        },
        DataType::FormUrlEncoded => {
            let Value::Object(fields) = body else {
                return Err(unencodable(content_type, body));
            };
            let mut pairs = Vec::with_capacity(fields.len());
            for (key, value) in fields {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => String::new(),
                    Value::Array(_) | Value::Object(_) => {
                        return Err(unencodable(content_type, body).with_key(key.as_str()));
                    }
                };
                pairs.push(format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&rendered)
                ));
            }
            pairs.join("&")
        }
    };

    Ok(EncodedBody {
        content_type: content_type.to_string(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_no_body_encodes_to_none() {
        assert_eq!(parse_request_body(None, None, &HashMap::new()).unwrap(), None);
    }

    #[test]
    fn test_defaults_to_json() {
        let body = json!({"name": "widget", "tags": ["a"]});
        let encoded = parse_request_body(Some(&body), None, &HashMap::new())
            .unwrap()
            .unwrap();

        assert_eq!(encoded.content_type, "application/json");
        let decoded: Value = serde_json::from_str(&encoded.content).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn test_text_requires_string() {
        let encoded = parse_request_body(Some(&json!("hello")), Some(DataType::Text), &HashMap::new())
            .unwrap()
            .unwrap();
        assert_eq!(encoded.content, "hello");
        assert_eq!(encoded.content_type, "text/plain");

        let error =
            parse_request_body(Some(&json!({"a": 1})), Some(DataType::Text), &HashMap::new())
                .unwrap_err();
        assert_eq!(error.field, ValidationField::RequestBody);
        assert_eq!(error.constraint.name(), "unencodable");
    }

    #[test]
    fn test_form_encodes_flat_object() {
        let body = json!({"q": "a b", "page": 2, "draft": false});
        let encoded = parse_request_body(Some(&body), Some(DataType::FormUrlEncoded), &HashMap::new())
            .unwrap()
            .unwrap();

        assert_eq!(encoded.content_type, "application/x-www-form-urlencoded");
        assert!(encoded.content.contains("q=a%20b"));
        assert!(encoded.content.contains("page=2"));
        assert!(encoded.content.contains("draft=false"));
    }

    #[test]
    fn test_form_rejects_nested_values() {
        let body = json!({"filter": {"a": 1}});
        let error =
            parse_request_body(Some(&body), Some(DataType::FormUrlEncoded), &HashMap::new())
                .unwrap_err();
        assert_eq!(error.constraint.name(), "unencodable");
        assert_eq!(error.key.as_deref(), Some("filter"));

        let error = parse_request_body(
            Some(&json!([1, 2])),
            Some(DataType::FormUrlEncoded),
            &HashMap::new(),
        )
        .unwrap_err();
        assert_eq!(error.constraint.name(), "unencodable");
    }

    #[test]
    fn test_header_and_body_type_must_agree() {
        let error = parse_request_body(
            Some(&json!("hi")),
            Some(DataType::Json),
            &headers(&[("Content-Type", "text/plain")]),
        )
        .unwrap_err();

        assert_eq!(
            error.constraint,
            Constraint::ContentTypeMismatch {
                header: "text/plain".to_string(),
                body_type: "application/json".to_string(),
            }
        );
    }

    #[test]
    fn test_header_selects_encoding_when_body_type_unset() {
        let encoded = parse_request_body(
            Some(&json!("raw")),
            None,
            &headers(&[("content-type", "text/plain; charset=utf-8")]),
        )
        .unwrap()
        .unwrap();
        assert_eq!(encoded.content, "raw");
        assert_eq!(encoded.content_type, "text/plain");
    }

    #[test]
    fn test_unknown_header_content_type_sends_strings_verbatim() {
        let encoded = parse_request_body(
            Some(&json!("<a/>")),
            None,
            &headers(&[("Content-Type", "application/xml")]),
        )
        .unwrap()
        .unwrap();
        assert_eq!(encoded.content_type, "application/xml");
        assert_eq!(encoded.content, "<a/>");

        let error = parse_request_body(
            Some(&json!({"a": 1})),
            None,
            &headers(&[("Content-Type", "application/xml")]),
        )
        .unwrap_err();
        assert_eq!(error.constraint.name(), "unencodable");
    }
}
