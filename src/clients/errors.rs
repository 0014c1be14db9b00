//! The error taxonomy surfaced by the request layer.
//!
//! Every failure a caller sees is exactly one [`ErrorRecord`]:
//!
//! - [`ValidationError`]: An input was rejected before any network I/O
//! - [`RequestError`]: No response was obtainable (network, timeout, abort)
//! - [`ResponseError`]: A response arrived but signals failure
//! - [`TransportError`]: The transport failed in a way that is neither of the above
//! - [`UnknownError`]: Anything else, with the raw cause preserved
//!
//! # Example
//!
//! ```rust,ignore
//! use http_alchemy::{ErrorRecord, HttpClient};
//!
//! match client.execute(spec).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(ErrorRecord::Validation(e)) => println!("Fix the request: {e}"),
//!     Err(ErrorRecord::Request(e)) => println!("No response: {e}"),
//!     Err(ErrorRecord::Response(e)) => println!("Status {}: {}", e.status, e.message),
//!     Err(other) => println!("{:?}: {other}", other.kind()),
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::clients::http_response::HttpResponse;

/// A shared, type-erased underlying cause kept for diagnostics.
pub type BoxedCause = Arc<dyn StdError + Send + Sync>;

/// The closed set of error kinds a caller can branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An input failed validation.
    Validation,
    /// No response could be obtained.
    Request,
    /// A response was received but indicates failure.
    Response,
    /// The transport failed without a more specific classification.
    Transport,
    /// The failure matched no recognized shape.
    Unknown,
}

impl ErrorKind {
    /// Returns the kind name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Request => "request",
            Self::Response => "response",
            Self::Transport => "transport",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The request input a [`ValidationError`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationField {
    /// The URL template.
    Url,
    /// The path parameters.
    PathParams,
    /// The query parameters.
    QueryParams,
    /// The request body.
    RequestBody,
    /// The response body.
    ResponseBody,
    /// The retry options.
    RetryOptions,
    /// The per-attempt timeout.
    Timeout,
}

impl ValidationField {
    /// Returns the field name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::PathParams => "path_params",
            Self::QueryParams => "query_params",
            Self::RequestBody => "request_body",
            Self::ResponseBody => "response_body",
            Self::RetryOptions => "retry_options",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for ValidationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The constraint a rejected input violated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The value is empty.
    #[error("must not be empty")]
    Empty,

    /// A `{placeholder}` is not a valid identifier.
    #[error("placeholder names must be identifiers")]
    MalformedPlaceholder,

    /// A brace has no matching partner.
    #[error("braces must be balanced")]
    UnbalancedBrace,

    /// The URL scheme is empty or not alphabetic.
    #[error("absolute URLs need an alphabetic scheme")]
    InvalidScheme,

    /// An absolute URL has no host.
    #[error("absolute URLs need a host")]
    MissingHost,

    /// A placeholder has no corresponding path parameter.
    #[error("missing path parameter")]
    MissingKey,

    /// A path parameter has no corresponding placeholder.
    #[error("path parameter does not appear in the URL template")]
    ExtraKey,

    /// The value cannot be rendered as a string.
    #[error("value must be a string, number or boolean")]
    NotStringifiable,

    /// A key appears more than once.
    #[error("keys must be unique")]
    DuplicateKey,

    /// A value nests objects or arrays.
    #[error("values must be scalars or arrays of scalars")]
    NestedValue,

    /// The body shape does not fit the content type.
    #[error("body cannot be encoded as {content_type}")]
    Unencodable {
        /// The content type the body was checked against.
        content_type: String,
    },

    /// An explicit `Content-Type` header disagrees with the body type.
    #[error("content type header '{header}' does not match body type '{body_type}'")]
    ContentTypeMismatch {
        /// The header value.
        header: String,
        /// The declared body content type.
        body_type: String,
    },

    /// The response body does not decode as the expected content type.
    #[error("body does not decode as {content_type}")]
    Undecodable {
        /// The content type decoding was attempted with.
        content_type: String,
    },

    /// A duration that must be positive is zero.
    #[error("must be greater than zero")]
    NotPositive,

    /// A value exceeds its upper sanity bound.
    #[error("must be at most {max}")]
    ExceedsMaximum {
        /// The bound, rendered for display.
        max: String,
    },

    /// The backoff cap is below the base delay.
    #[error("backoff cap must not be below the base delay")]
    CapBelowBase,

    /// A status code is outside 100..=599.
    #[error("status codes must be between 100 and 599")]
    InvalidStatus,
}

impl Constraint {
    /// Returns the constraint's machine-readable name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::MalformedPlaceholder => "malformed_placeholder",
            Self::UnbalancedBrace => "unbalanced_brace",
            Self::InvalidScheme => "invalid_scheme",
            Self::MissingHost => "missing_host",
            Self::MissingKey => "missing_key",
            Self::ExtraKey => "extra_key",
            Self::NotStringifiable => "not_stringifiable",
            Self::DuplicateKey => "duplicate_key",
            Self::NestedValue => "nested_value",
            Self::Unencodable { .. } => "unencodable",
            Self::ContentTypeMismatch { .. } => "content_type_mismatch",
            Self::Undecodable { .. } => "undecodable",
            Self::NotPositive => "not_positive",
            Self::ExceedsMaximum { .. } => "exceeds_maximum",
            Self::CapBelowBase => "cap_below_base",
            Self::InvalidStatus => "invalid_status",
        }
    }
}

/// Error returned when a request input fails validation.
///
/// Validation errors are caller-fixable and never retried.
///
/// # Example
///
/// ```rust
/// use http_alchemy::clients::{Constraint, ValidationError, ValidationField};
///
/// let error = ValidationError::new(ValidationField::PathParams, Constraint::MissingKey, "")
///     .with_key("id");
///
/// assert_eq!(error.key.as_deref(), Some("id"));
/// assert!(error.to_string().contains("missing path parameter"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid {field}{}: {constraint} (got {value:?})", key_suffix(.key))]
pub struct ValidationError {
    /// Which input failed.
    pub field: ValidationField,
    /// The violated constraint.
    pub constraint: Constraint,
    /// The offending key within the field, when the field is a mapping.
    pub key: Option<String>,
    /// The offending raw value, for diagnostics.
    pub value: String,
}

#[allow(clippy::ref_option)]
fn key_suffix(key: &Option<String>) -> String {
    key.as_ref().map_or(String::new(), |key| format!(" '{key}'"))
}

impl ValidationError {
    /// Creates a validation error without a key.
    #[must_use]
    pub fn new(field: ValidationField, constraint: Constraint, value: impl Into<String>) -> Self {
        Self {
            field,
            constraint,
            key: None,
            value: value.into(),
        }
    }

    /// Attaches the offending key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Why no response could be obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestErrorKind {
    /// Connection failed, dropped, or the request could not be written.
    Network,
    /// The attempt exceeded its timeout.
    Timeout,
    /// The run was aborted by the caller.
    Aborted,
}

/// Error returned when a request failed before a response was obtainable.
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct RequestError {
    /// What went wrong.
    pub kind: RequestErrorKind,
    /// Human-readable description.
    pub message: String,
    /// The underlying transport failure, if any.
    #[source]
    pub cause: Option<BoxedCause>,
}

impl RequestError {
    /// Creates the error produced when a run is aborted.
    #[must_use]
    pub fn aborted() -> Self {
        Self {
            kind: RequestErrorKind::Aborted,
            message: "Request aborted".to_string(),
            cause: None,
        }
    }
}

/// Why a received response counts as a failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseFailure {
    /// The status code is not 2xx.
    Status,
    /// The body failed response-body validation.
    Body(Constraint),
}

/// Error returned when a response was received but indicates failure.
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct ResponseError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// Human-readable description, including the request id when present.
    pub message: String,
    /// Whether the status or the body caused the failure.
    pub failure: ResponseFailure,
    /// The response as received.
    pub response: HttpResponse,
    /// The underlying failure, if any.
    #[source]
    pub cause: Option<BoxedCause>,
}

/// Error returned when the transport failed in an unclassifiable way.
///
/// Typical examples are requests the transport refused to build or
/// redirect-policy violations.
#[derive(Debug, Error, Clone)]
#[error("Transport error: {message}")]
pub struct TransportError {
    /// Human-readable description.
    pub message: String,
    /// The raw transport failure.
    #[source]
    pub cause: Option<BoxedCause>,
}

/// Error returned for failures that match no recognized shape.
#[derive(Debug, Error, Clone)]
#[error("Unknown error: {message}")]
pub struct UnknownError {
    /// Human-readable description.
    pub message: String,
    /// The raw failure.
    #[source]
    pub cause: BoxedCause,
}

/// The uniform error returned by the request layer.
///
/// Use [`ErrorRecord::kind`] for coarse branching, or match the variants for
/// the kind-specific data.
#[derive(Debug, Error, Clone)]
pub enum ErrorRecord {
    /// Request validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No response was obtainable.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// A response signalled failure.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// Unclassified transport failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Unrecognized failure.
    #[error(transparent)]
    Unknown(#[from] UnknownError),
}

impl ErrorRecord {
    /// Returns the kind tag of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Request(_) => ErrorKind::Request,
            Self::Response(_) => ErrorKind::Response,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Request(e) => e.message.clone(),
            Self::Response(e) => e.message.clone(),
            Self::Transport(e) => e.message.clone(),
            Self::Unknown(e) => e.message.clone(),
        }
    }

    /// Returns the response received, if any.
    #[must_use]
    pub const fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Response(e) => Some(&e.response),
            _ => None,
        }
    }

    /// Returns the HTTP status of the response received, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.status),
            _ => None,
        }
    }

    /// Returns `true` if the run was aborted by the caller.
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(
            self,
            Self::Request(RequestError {
                kind: RequestErrorKind::Aborted,
                ..
            })
        )
    }
}
