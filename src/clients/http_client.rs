//! The request orchestrator.
//!
//! This module provides the [`HttpClient`] type, which runs the full
//! request pipeline: validate, build, send, classify and retry.

use std::sync::Arc;

use crate::alchemy::{ErrorAlchemy, Failure, Verdict};
use crate::clients::abort::AbortSignal;
use crate::clients::errors::{ErrorKind, ErrorRecord, RequestError};
use crate::clients::http_request::RequestSpec;
use crate::clients::http_response::HttpResponse;
use crate::clients::logger::{LogOutcome, LogPhase, LogRecord, RequestLogger, TracingLogger};
use crate::clients::transport::{RawTransportError, ReqwestTransport, Transport, TransportRequest};
use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::helpers::{
    append_query_string, check_response, encode_query_string, merge_headers_with_defaults,
    replace_path_params,
};
use crate::validators::{parse_response_body, validate_request, ValidatedRequest};

/// Executes [`RequestSpec`]s against a [`Transport`].
///
/// The client handles:
/// - Input validation before any network I/O
/// - Base URL merging, path substitution, query encoding and header merging
/// - A per-attempt timeout
/// - Retries according to the request's [`RetryOptions`](crate::RetryOptions)
/// - Response-body decoding
/// - Mapping every failure onto one [`ErrorRecord`]
///
/// Attempts of one run are strictly sequential.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync` and cheap to clone; clones share the
/// transport and logger.
///
/// # Example
///
/// ```rust,ignore
/// use http_alchemy::{BaseUrl, ClientConfig, HttpClient, HttpMethod, RequestSpec, RetryOptions};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://api.example.com")?)
///     .build()?;
/// let client = HttpClient::new(config)?;
///
/// let spec = RequestSpec::builder(HttpMethod::Get, "/users/{id}")
///     .path_param("id", "42")
///     .retry_options(RetryOptions::new(2))
///     .build();
///
/// let response = client.execute(spec).await?;
/// println!("{}", response.body);
/// ```
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    logger: Arc<dyn RequestLogger>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Creates a client backed by [`ReqwestTransport`] that logs through
    /// `tracing`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportBuild`] if the `reqwest` client cannot
    /// be created.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }

    /// Creates a client on top of a custom transport.
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
            logger: Arc::new(TracingLogger),
        }
    }

    /// Replaces the logger.
    #[must_use]
    pub fn with_logger(mut self, logger: impl RequestLogger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Executes a request.
    ///
    /// # Errors
    ///
    /// Returns the final [`ErrorRecord`]: a validation error before any I/O,
    /// or the classified failure of the last attempt.
    pub async fn execute(&self, spec: RequestSpec) -> Result<HttpResponse, ErrorRecord> {
        self.execute_with_abort(spec, &AbortSignal::new()).await
    }

    /// Executes a request that can be cancelled through `signal`.
    ///
    /// The signal is checked before every attempt and raced against every
    /// transport call and backoff wait. Dropping the in-flight transport
    /// future cancels the network operation.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute), plus a [`RequestError`] of kind
    /// [`Aborted`](crate::RequestErrorKind::Aborted) when the run is aborted.
    pub async fn execute_with_abort(
        &self,
        spec: RequestSpec,
        signal: &AbortSignal,
    ) -> Result<HttpResponse, ErrorRecord> {
        let validated = match validate_request(&spec, &self.config) {
            Ok(validated) => validated,
            Err(error) => {
                self.log(
                    LogRecord::new(LogPhase::Validation, 0, LogOutcome::Failed)
                        .with_error_kind(ErrorKind::Validation),
                );
                return Err(error.into());
            }
        };

        let request = self.build_request(&validated);
        let alchemy = ErrorAlchemy::new(&validated.retry_options);

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            if signal.is_aborted() {
                return Err(self.aborted(attempt));
            }

            self.log(LogRecord::new(LogPhase::Attempt, attempt, LogOutcome::Started));

            let outcome = tokio::select! {
                biased;
                () = signal.aborted() => return Err(self.aborted(attempt)),
                outcome = self.attempt(&request, &validated) => outcome,
            };

            let failure = match outcome {
                Ok(response) => {
                    self.log(LogRecord::new(LogPhase::Complete, attempt, LogOutcome::Succeeded));
                    return Ok(response);
                }
                Err(failure) => failure,
            };

            match alchemy.assess(failure, attempt) {
                Verdict::Fail(error) => {
                    self.log(
                        LogRecord::new(LogPhase::Complete, attempt, LogOutcome::Failed)
                            .with_error_kind(error.kind()),
                    );
                    return Err(error);
                }
                Verdict::Retry { error, delay } => {
                    self.log(
                        LogRecord::new(LogPhase::Retry, attempt, LogOutcome::Retrying)
                            .with_error_kind(error.kind()),
                    );
                    tracing::debug!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "waiting before retry"
                    );
                    tokio::select! {
                        biased;
                        () = signal.aborted() => return Err(self.aborted(attempt)),
                        () = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    /// Performs one attempt: send with timeout, check status, decode body.
    async fn attempt(
        &self,
        request: &TransportRequest,
        validated: &ValidatedRequest,
    ) -> Result<HttpResponse, Failure> {
        let raw = tokio::time::timeout(request.timeout, self.transport.send(request.clone()))
            .await
            .map_err(|_| RawTransportError::timeout(request.timeout))??;
        let raw = check_response(raw)?;

        match parse_response_body(&raw, validated.response_type) {
            Ok(body) => Ok(HttpResponse::new(raw, body)),
            Err(error) => Err(Failure::Decode {
                response: raw,
                error,
            }),
        }
    }

    fn build_request(&self, validated: &ValidatedRequest) -> TransportRequest {
        let path = replace_path_params(&validated.url.template, &validated.path_params);
        let url = append_query_string(&path, &encode_query_string(&validated.query_params));

        let headers = merge_headers_with_defaults(
            self.config.default_headers(),
            &validated.headers,
            validated.body.as_ref().map(|body| body.content_type.as_str()),
        );

        TransportRequest {
            method: validated.method.clone(),
            url,
            headers,
            body: validated.body.as_ref().map(|body| body.content.clone()),
            timeout: validated.timeout,
        }
    }

    fn aborted(&self, attempt: u32) -> ErrorRecord {
        self.log(
            LogRecord::new(LogPhase::Complete, attempt, LogOutcome::Aborted)
                .with_error_kind(ErrorKind::Request),
        );
        RequestError::aborted().into()
    }

    fn log(&self, record: LogRecord) {
        self.logger.log(&record);
    }
}
