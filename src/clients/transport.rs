//! The transport boundary.
//!
//! A [`Transport`] performs the actual network I/O. It returns either a
//! [`RawResponse`], whatever its status, or a [`RawTransportError`] describing
//! why no usable response came back. Status checking, decoding and retries
//! happen above this boundary.
//!
//! [`ReqwestTransport`] is the default implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::clients::http_request::HttpMethod;
use crate::error::ConfigError;

/// A fully-built request handed to a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The final URL, query string included.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// The encoded request body, if any.
    pub body: Option<String>,
    /// Per-attempt timeout.
    pub timeout: Duration,
}

/// A response exactly as the transport received it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers, lowercase names, possibly multi-valued.
    pub headers: HashMap<String, Vec<String>>,
    /// The undecoded body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a raw response, lowercasing header names.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        let mut lowered: HashMap<String, Vec<String>> = HashMap::new();
        for (name, values) in headers {
            lowered
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(values);
        }
        Self {
            status,
            headers: lowered,
            body,
        }
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Where in the exchange a transport failure happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// The connection could not be established.
    Connect,
    /// The transport's own timeout fired.
    Timeout,
    /// The request could not be sent or the connection dropped.
    Request,
    /// The response body could not be read.
    Body,
    /// The transport refused to build the request.
    Builder,
    /// The transport stopped waiting because the run was aborted.
    Aborted,
    /// The response status signals failure.
    Status,
    /// Anything else.
    Other,
}

/// A failure reported by a transport, in the transport's own shape.
///
/// The one question the error taxonomy asks of it is whether a response was
/// attached.
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct RawTransportError {
    /// Where the failure happened.
    pub kind: TransportErrorKind,
    /// Human-readable description.
    pub message: String,
    /// The response received before the failure, if any.
    pub response: Option<RawResponse>,
    /// The transport's native error, if any.
    #[source]
    pub cause: Option<crate::clients::errors::BoxedCause>,
}

impl RawTransportError {
    /// Creates an error without an attached response.
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            response: None,
            cause: None,
        }
    }

    /// Creates the error reported for a non-2xx response.
    #[must_use]
    pub fn status(response: RawResponse) -> Self {
        Self {
            kind: TransportErrorKind::Status,
            message: format!("Request failed with status code {}", response.status),
            response: Some(response),
            cause: None,
        }
    }

    /// Creates the error reported when an attempt exceeds its timeout.
    #[must_use]
    pub fn timeout(timeout: Duration) -> Self {
        Self::new(
            TransportErrorKind::Timeout,
            format!("timeout of {}ms exceeded", timeout.as_millis()),
        )
    }

    /// Attaches the transport's native error.
    #[must_use]
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(std::sync::Arc::new(cause));
        self
    }

    /// Returns `true` if a response was attached.
    #[must_use]
    pub const fn has_response(&self) -> bool {
        self.response.is_some()
    }
}

/// Performs network I/O for the request layer.
///
/// Implementations must not treat non-2xx statuses as errors; they return the
/// response and let the caller decide. Cancellation happens by dropping the
/// returned future.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request and returns the raw response.
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, RawTransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, RawTransportError> {
        (**self).send(request).await
    }
}

/// A [`Transport`] backed by a `reqwest` client.
///
/// # Thread Safety
///
/// `ReqwestTransport` is `Send + Sync` and cheap to clone.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

// Verify ReqwestTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestTransport>();
};

impl ReqwestTransport {
    /// Creates a transport with a rustls-backed `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportBuild`] if the client cannot be
    /// created (e.g., TLS initialization failure).
    pub fn new() -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| ConfigError::TransportBuild {
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Wraps an existing `reqwest` client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn classify(error: &reqwest::Error) -> TransportErrorKind {
        if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else if error.is_builder() {
            TransportErrorKind::Builder
        } else if error.is_body() || error.is_decode() {
            TransportErrorKind::Body
        } else if error.is_request() {
            TransportErrorKind::Request
        } else {
            TransportErrorKind::Other
        }
    }

    fn map_error(error: reqwest::Error) -> RawTransportError {
        RawTransportError::new(Self::classify(&error), error.to_string()).with_cause(error)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, RawTransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes()).map_err(
            |e| {
                RawTransportError::new(
                    TransportErrorKind::Builder,
                    format!("Invalid HTTP method {}", request.method),
                )
                .with_cause(e)
            },
        )?;

        let mut builder = self
            .client
            .request(method, &request.url)
            .timeout(request.timeout);

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let res = builder.send().await.map_err(Self::map_error)?;

        let status = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await.map_err(Self::map_error)?;

        tracing::trace!(status, url = %request.url, "transport received response");

        Ok(RawResponse::new(status, headers, body.to_vec()))
    }
}
