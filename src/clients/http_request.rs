//! Request description types.
//!
//! This module provides [`RequestSpec`], the declarative description of one
//! HTTP call, and its builder.

use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde_json::Value;

use crate::clients::retry::RetryOptions;

/// HTTP methods.
///
/// The standard verbs have their own variants; anything else travels as
/// [`HttpMethod::Custom`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method.
    Get,
    /// HTTP POST method.
    Post,
    /// HTTP PUT method.
    Put,
    /// HTTP PATCH method.
    Patch,
    /// HTTP DELETE method.
    Delete,
    /// HTTP HEAD method.
    Head,
    /// HTTP OPTIONS method.
    Options,
    /// Any other method token, sent as given.
    Custom(String),
}

impl HttpMethod {
    /// Returns the method as it appears on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Custom(method) => method,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Infallible;

    /// Parses a method name, matching the standard verbs case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            _ => Self::Custom(s.to_string()),
        })
    }
}

impl From<&str> for HttpMethod {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(method) => method,
            Err(never) => match never {},
        }
    }
}

/// Content type for request bodies.
///
/// Specifies how the body is encoded and sets the `Content-Type` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// JSON content type (`application/json`).
    Json,
    /// Plain text content type (`text/plain`).
    Text,
    /// Form content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
}

impl DataType {
    /// Returns the MIME type string for this data type.
    #[must_use]
    pub const fn as_content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }

    /// Matches a `Content-Type` header value, ignoring parameters and case.
    #[must_use]
    pub fn from_content_type(header: &str) -> Option<Self> {
        let mime = header.split(';').next()?.trim().to_ascii_lowercase();
        match mime.as_str() {
            "application/json" => Some(Self::Json),
            "text/plain" => Some(Self::Text),
            "application/x-www-form-urlencoded" => Some(Self::FormUrlEncoded),
            _ if mime.ends_with("+json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// How response bodies are decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResponseType {
    /// JSON when the response `Content-Type` says so, text otherwise.
    #[default]
    Auto,
    /// Always decode as JSON.
    Json,
    /// Always decode as UTF-8 text.
    Text,
}

/// A declarative description of one HTTP call.
///
/// Use [`RequestSpec::builder`] to construct one. Nothing is validated
/// until the request is executed (or [`normalized`](Self::normalized)), so
/// fields can be set in any order.
///
/// # Example
///
/// ```rust
/// use http_alchemy::{HttpMethod, RequestSpec, RetryOptions};
/// use serde_json::json;
///
/// let spec = RequestSpec::builder(HttpMethod::Get, "/users/{id}")
///     .path_param("id", 42)
///     .query_param("expand", json!(["teams", "roles"]))
///     .retry_options(RetryOptions::new(2))
///     .build();
///
/// assert_eq!(spec.path_params["id"], json!(42));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
    /// The HTTP method for this request.
    pub method: HttpMethod,
    /// The URL template, absolute or relative to the configured base URL.
    pub url: String,
    /// Values for the `{placeholder}` tokens in the URL template.
    pub path_params: BTreeMap<String, Value>,
    /// Query parameters in insertion order.
    pub query_params: Vec<(String, Value)>,
    /// The request body, if any.
    pub body: Option<Value>,
    /// The content type of the body (JSON when unset).
    pub body_type: Option<DataType>,
    /// How to decode the response body.
    pub response_type: ResponseType,
    /// Headers for this request; they take precedence over default headers.
    pub headers: HashMap<String, String>,
    /// Per-attempt timeout; the client default applies when unset.
    pub timeout: Option<Duration>,
    /// Retry policy; the client default applies when unset.
    pub retry_options: Option<RetryOptions>,
}

impl RequestSpec {
    /// Creates a new builder for constructing a `RequestSpec`.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method for the request
    /// * `url` - The URL template for the request
    #[must_use]
    pub fn builder(method: impl Into<HttpMethod>, url: impl Into<String>) -> RequestSpecBuilder {
        RequestSpecBuilder::new(method.into(), url)
    }
}

/// Builder for constructing [`RequestSpec`] instances.
#[derive(Debug)]
pub struct RequestSpecBuilder {
    spec: RequestSpec,
}

impl RequestSpecBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            spec: RequestSpec {
                method,
                url: url.into(),
                path_params: BTreeMap::new(),
                query_params: Vec::new(),
                body: None,
                body_type: None,
                response_type: ResponseType::default(),
                headers: HashMap::new(),
                timeout: None,
                retry_options: None,
            },
        }
    }

    /// Adds a single path parameter.
    #[must_use]
    pub fn path_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.spec.path_params.insert(key.into(), value.into());
        self
    }

    /// Sets all path parameters at once.
    #[must_use]
    pub fn path_params(mut self, params: BTreeMap<String, Value>) -> Self {
        self.spec.path_params = params;
        self
    }

    /// Adds a single query parameter.
    ///
    /// Arrays expand to repeated keys; `null` values are dropped.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.spec.query_params.push((key.into(), value.into()));
        self
    }

    /// Sets all query parameters at once.
    #[must_use]
    pub fn query_params(mut self, params: Vec<(String, Value)>) -> Self {
        self.spec.query_params = params;
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.spec.body = Some(body.into());
        self
    }

    /// Sets the content type of the request body.
    #[must_use]
    pub const fn body_type(mut self, body_type: DataType) -> Self {
        self.spec.body_type = Some(body_type);
        self
    }

    /// Sets how the response body is decoded.
    #[must_use]
    pub const fn response_type(mut self, response_type: ResponseType) -> Self {
        self.spec.response_type = response_type;
        self
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.headers.insert(key.into(), value.into());
        self
    }

    /// Sets all headers at once.
    #[must_use]
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.spec.headers = headers;
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.spec.timeout = Some(timeout);
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn retry_options(mut self, options: RetryOptions) -> Self {
        self.spec.retry_options = Some(options);
        self
    }

    /// Builds the [`RequestSpec`].
    #[must_use]
    pub fn build(self) -> RequestSpec {
        self.spec
    }
}
