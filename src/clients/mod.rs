//! Request execution types.
//!
//! This module provides the request layer: describing a call, executing it
//! with retries, and reporting failures through one error taxonomy.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`RequestSpec`]: A declarative description of one HTTP call
//! - [`HttpClient`]: The orchestrator that validates, sends and retries
//! - [`HttpRequestHandler`]: A stateful wrapper tracking the latest run
//! - [`HttpResponse`]: A decoded response
//! - [`ErrorRecord`]: The uniform error returned on failure
//! - [`RetryOptions`] and [`Backoff`]: The retry policy
//! - [`Transport`]: The network boundary, implemented by [`ReqwestTransport`]
//! - [`RequestLogger`]: The logging boundary, implemented by [`TracingLogger`]
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use http_alchemy::{Backoff, BaseUrl, ClientConfig, HttpClient, HttpMethod, RequestSpec, RetryOptions};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com")?)
//!     .build()?;
//! let client = HttpClient::new(config)?;
//!
//! let spec = RequestSpec::builder(HttpMethod::Get, "/users/{id}")
//!     .path_param("id", "42")
//!     .retry_options(RetryOptions::new(2).backoff(Backoff::Fixed(Duration::from_millis(100))))
//!     .build();
//!
//! let response = client.execute(spec).await?;
//! ```
//!
//! # Retry Behavior
//!
//! A request is sent at most `max_attempts + 1` times. By default only
//! network failures and timeouts are retried, plus responses with status
//! 408, 429, 500, 502, 503 or 504. A `Retry-After` header replaces the
//! backoff delay, up to a one-minute cap. Validation errors, unknown
//! failures and aborted runs are never retried.

mod abort;
mod errors;
mod handler;
mod http_client;
mod http_request;
mod http_response;
mod logger;
mod retry;
mod transport;

pub use abort::AbortSignal;
pub use errors::{
    BoxedCause, Constraint, ErrorKind, ErrorRecord, RequestError, RequestErrorKind,
    ResponseError, ResponseFailure, TransportError, UnknownError, ValidationError,
    ValidationField,
};
pub use handler::{HandlerState, HttpRequestHandler};
pub use http_client::HttpClient;
pub use http_request::{DataType, HttpMethod, RequestSpec, RequestSpecBuilder, ResponseType};
pub use http_response::HttpResponse;
pub use logger::{LogOutcome, LogPhase, LogRecord, NoopLogger, RequestLogger, TracingLogger};
pub use retry::{Backoff, RetryOptions, DEFAULT_MAX_RETRY_AFTER, DEFAULT_RETRY_STATUSES};
pub use transport::{
    RawResponse, RawTransportError, ReqwestTransport, Transport, TransportErrorKind,
    TransportRequest,
};
