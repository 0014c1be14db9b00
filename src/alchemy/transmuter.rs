//! Mapping raw failures onto the error taxonomy.

use std::sync::Arc;

use serde_json::Value;

use crate::clients::{
    BoxedCause, ErrorRecord, HttpResponse, RawResponse, RawTransportError, RequestError,
    RequestErrorKind, ResponseError, ResponseFailure, ResponseType, TransportError,
    TransportErrorKind, UnknownError, ValidationError,
};
use crate::validators::parse_response_body;

/// A raw failure caught while executing a request.
#[derive(Debug, Clone)]
pub enum Failure {
    /// The transport failed, or the response status signalled failure.
    Transport(RawTransportError),
    /// A request input failed validation.
    Validation(ValidationError),
    /// A response arrived but its body failed validation.
    Decode {
        /// The response as received.
        response: RawResponse,
        /// The response-body validation failure.
        error: ValidationError,
    },
    /// Anything else.
    Other(BoxedCause),
}

impl From<RawTransportError> for Failure {
    fn from(error: RawTransportError) -> Self {
        Self::Transport(error)
    }
}

impl From<ValidationError> for Failure {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

/// Classifies a raw failure as exactly one [`ErrorRecord`].
///
/// Transport failures with an attached response become
/// [`ErrorRecord::Response`]. Without one, timeouts, connection and I/O
/// failures become [`ErrorRecord::Request`], and the rest stay
/// [`ErrorRecord::Transport`]. Validation errors pass through unchanged;
/// anything unrecognized becomes [`ErrorRecord::Unknown`].
#[must_use]
pub fn transmute(failure: Failure) -> ErrorRecord {
    match failure {
        Failure::Transport(error) => transmute_transport(error),
        Failure::Validation(error) => ErrorRecord::Validation(error),
        Failure::Decode { response, error } => {
            let body = Value::String(response.text_lossy());
            let response = HttpResponse::new(response, body);
            ErrorRecord::Response(ResponseError {
                status: response.status,
                message: with_request_id(error.to_string(), &response),
                failure: ResponseFailure::Body(error.constraint.clone()),
                response,
                cause: Some(Arc::new(error)),
            })
        }
        Failure::Other(cause) => ErrorRecord::Unknown(UnknownError {
            message: cause.to_string(),
            cause,
        }),
    }
}

fn transmute_transport(mut error: RawTransportError) -> ErrorRecord {
    if let Some(raw) = error.response.take() {
        let body = parse_response_body(&raw, ResponseType::Auto)
            .unwrap_or_else(|_| Value::String(raw.text_lossy()));
        let response = HttpResponse::new(raw, body);
        let message = with_request_id(describe(&error.message, &response), &response);
        return ErrorRecord::Response(ResponseError {
            status: response.status,
            message,
            failure: ResponseFailure::Status,
            response,
            cause: Some(Arc::new(error)),
        });
    }

    let kind = match error.kind {
        TransportErrorKind::Timeout => RequestErrorKind::Timeout,
        TransportErrorKind::Connect | TransportErrorKind::Request | TransportErrorKind::Body => {
            RequestErrorKind::Network
        }
        TransportErrorKind::Aborted => RequestErrorKind::Aborted,
        TransportErrorKind::Builder | TransportErrorKind::Status | TransportErrorKind::Other => {
            return ErrorRecord::Transport(TransportError {
                message: error.message.clone(),
                cause: Some(Arc::new(error)),
            });
        }
    };

    ErrorRecord::Request(RequestError {
        kind,
        message: error.message.clone(),
        cause: Some(Arc::new(error)),
    })
}

/// Appends the error fields of a JSON error body to `message`.
fn describe(message: &str, response: &HttpResponse) -> String {
    let mut details = serde_json::Map::new();
    for key in ["errors", "error", "error_description", "message"] {
        if let Some(value) = response.body.get(key) {
            details.insert(key.to_string(), value.clone());
        }
    }

    if details.is_empty() {
        message.to_string()
    } else {
        format!("{message}: {}", Value::Object(details))
    }
}

fn with_request_id(message: String, response: &HttpResponse) -> String {
    match response.request_id() {
        Some(id) => format!("{message} (request id: {id})"),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{Constraint, ErrorKind, ValidationField};
    use serde_json::json;
    use std::time::Duration;

    fn raw(status: u16, headers: &[(&str, &str)], body: &str) -> RawResponse {
        let headers = headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
            .collect();
        RawResponse::new(status, headers, body.as_bytes().to_vec())
    }

    #[test]
    fn test_attached_response_becomes_response_error() {
        let error = RawTransportError::status(raw(
            503,
            &[("content-type", "application/json"), ("x-request-id", "abc")],
            r#"{"error":"overloaded","trace":"x"}"#,
        ));

        let record = transmute(Failure::Transport(error));
        let ErrorRecord::Response(response_error) = &record else {
            panic!("expected a response error, got {record:?}");
        };

        assert_eq!(response_error.status, 503);
        assert_eq!(response_error.failure, ResponseFailure::Status);
        assert_eq!(response_error.response.body, json!({"error": "overloaded", "trace": "x"}));
        assert_eq!(
            response_error.message,
            r#"Request failed with status code 503: {"error":"overloaded"} (request id: abc)"#
        );
        assert!(std::error::Error::source(&record).is_some());
    }

    #[test]
    fn test_undecodable_error_body_is_kept_as_text() {
        let error = RawTransportError::status(raw(
            500,
            &[("content-type", "application/json")],
            "<html>oops</html>",
        ));

        let record = transmute(error.into());
        assert_eq!(record.response().map(|r| r.body.clone()), Some(json!("<html>oops</html>")));
        assert_eq!(record.message(), "Request failed with status code 500");
    }

    #[test]
    fn test_missing_response_becomes_request_error() {
        let cases = [
            (TransportErrorKind::Timeout, RequestErrorKind::Timeout),
            (TransportErrorKind::Connect, RequestErrorKind::Network),
            (TransportErrorKind::Request, RequestErrorKind::Network),
            (TransportErrorKind::Body, RequestErrorKind::Network),
            (TransportErrorKind::Aborted, RequestErrorKind::Aborted),
        ];
        for (transport_kind, expected) in cases {
            let record = transmute(RawTransportError::new(transport_kind, "failed").into());
            match record {
                ErrorRecord::Request(error) => {
                    assert_eq!(error.kind, expected);
                    assert_eq!(error.message, "failed");
                    assert!(error.cause.is_some());
                }
                other => panic!("expected a request error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_timeout_message_is_preserved() {
        let record = transmute(RawTransportError::timeout(Duration::from_millis(250)).into());
        assert_eq!(record.kind(), ErrorKind::Request);
        assert_eq!(record.message(), "timeout of 250ms exceeded");
    }

    #[test]
    fn test_unclassified_transport_failures_stay_transport_errors() {
        for kind in [TransportErrorKind::Builder, TransportErrorKind::Other] {
            let record = transmute(RawTransportError::new(kind, "bad method").into());
            assert_eq!(record.kind(), ErrorKind::Transport);
            assert_eq!(record.to_string(), "Transport error: bad method");
        }
    }

    #[test]
    fn test_validation_error_passes_through() {
        let error = ValidationError::new(ValidationField::Url, Constraint::Empty, "");
        match transmute(error.clone().into()) {
            ErrorRecord::Validation(passed) => assert_eq!(passed, error),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_failure_becomes_response_error() {
        let response = raw(200, &[("x-request-id", "r1")], "{oops");
        let error = ValidationError::new(
            ValidationField::ResponseBody,
            Constraint::Undecodable {
                content_type: "application/json".to_string(),
            },
            "{oops",
        );

        let record = transmute(Failure::Decode { response, error });
        let ErrorRecord::Response(response_error) = record else {
            panic!("expected a response error");
        };
        assert_eq!(response_error.status, 200);
        assert_eq!(
            response_error.failure,
            ResponseFailure::Body(Constraint::Undecodable {
                content_type: "application/json".to_string()
            })
        );
        assert_eq!(response_error.response.body, json!("{oops"));
        assert!(response_error.message.ends_with("(request id: r1)"));
    }

    #[test]
    fn test_anything_else_is_unknown() {
        let cause: BoxedCause = Arc::new(std::io::Error::new(std::io::ErrorKind::Other, "weird"));
        let record = transmute(Failure::Other(cause));
        assert_eq!(record.kind(), ErrorKind::Unknown);
        assert_eq!(record.message(), "weird");
        assert!(std::error::Error::source(&record).is_some());
    }

    #[test]
    fn test_empty_error_body_decodes_to_null() {
        let record = transmute(RawTransportError::status(raw(404, &[], "")).into());
        assert_eq!(record.response().map(|r| r.body.clone()), Some(Value::Null));
        assert_eq!(record.status(), Some(404));
    }
}
