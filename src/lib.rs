//! # http-alchemy
//!
//! A validated, retry-aware HTTP request execution layer that reports every
//! failure through one small error taxonomy.
//!
//! ## Overview
//!
//! This crate provides:
//! - Declarative request descriptions via [`RequestSpec`]
//! - Fail-fast validation of every input before any network I/O
//! - Per-attempt timeouts and configurable retries with fixed or exponential backoff
//! - Classification of every failure as exactly one [`ErrorRecord`]
//! - A stateful [`HttpRequestHandler`] where the most recent trigger wins
//! - Pluggable [`Transport`] and [`RequestLogger`] boundaries
//!
//! ## Quick Start
//!
//! ```rust
//! use http_alchemy::{BaseUrl, ClientConfig, HttpMethod, RequestSpec, RetryOptions};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .default_header("Accept", "application/json")
//!     .build()
//!     .unwrap();
//!
//! let spec = RequestSpec::builder(HttpMethod::Get, "/users/{id}")
//!     .path_param("id", "42")
//!     .retry_options(RetryOptions::new(2))
//!     .build();
//!
//! // Validation runs without touching the network.
//! let normalized = spec.normalized(&config).unwrap();
//! assert_eq!(normalized.url, "https://api.example.com/users/{id}");
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use http_alchemy::{ErrorRecord, HttpClient};
//!
//! let client = HttpClient::new(config)?;
//!
//! match client.execute(spec).await {
//!     Ok(response) => println!("{}", response.body),
//!     Err(ErrorRecord::Validation(e)) => eprintln!("bad request: {e}"),
//!     Err(e) => eprintln!("{} error: {e}", e.kind()),
//! }
//! ```
//!
//! ## Error Taxonomy
//!
//! | Kind | Meaning | Retried |
//! |------|---------|---------|
//! | [`ValidationError`] | An input was rejected before any I/O | Never |
//! | [`RequestError`] | No response was obtainable | When `Request` is a retry kind (default) |
//! | [`ResponseError`] | A response signalled failure | By status or when `Response` is a retry kind |
//! | [`TransportError`] | Unclassified transport failure | When `Transport` is a retry kind |
//! | [`UnknownError`] | Anything else | Never |
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Inputs are checked in a fixed order before any I/O
//! - **One error per failure**: Causes are preserved as `source()`, never stacked
//! - **Thread-safe**: All public types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime

pub mod alchemy;
pub mod clients;
pub mod config;
pub mod error;
pub mod helpers;
pub mod validators;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

// Re-export request layer types
pub use clients::{
    AbortSignal, Backoff, BoxedCause, Constraint, DataType, ErrorKind, ErrorRecord, HandlerState,
    HttpClient, HttpMethod, HttpRequestHandler, HttpResponse, LogOutcome, LogPhase, LogRecord,
    NoopLogger, RawResponse, RawTransportError, RequestError, RequestErrorKind, RequestLogger,
    RequestSpec, RequestSpecBuilder, ReqwestTransport, ResponseError, ResponseFailure,
    ResponseType, RetryOptions, TracingLogger, Transport, TransportError, TransportErrorKind,
    TransportRequest, UnknownError, ValidationError, ValidationField,
};
