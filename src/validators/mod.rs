//! Request input validators.
//!
//! Each validator checks one input category and returns either a normalized
//! value or a [`ValidationError`]. They are pure and independent, except that
//! path parameters are checked against the placeholders found by
//! [`parse_url`].
//!
//! [`validate_request`] runs them in a fixed order and stops at the first
//! failure:
//!
//! 1. URL (merged with the configured base URL)
//! 2. Path parameters
//! 3. Query parameters
//! 4. Request body
//! 5. Retry options
//! 6. Timeout
//!
//! The response body validator runs later, once a response has arrived.

mod path_params;
mod query_params;
mod request_body;
mod response_body;
mod retry_options;
mod timeout;
mod url;

pub use path_params::parse_path_params;
pub use query_params::{parse_query_params, QueryValue};
pub use request_body::{parse_request_body, EncodedBody};
pub use response_body::parse_response_body;
pub use retry_options::{parse_retry_options, MAX_RETRY_ATTEMPTS};
pub use timeout::parse_timeout;
pub use url::{parse_url, UrlTemplate};

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde_json::Value;

use crate::clients::{
    Constraint, HttpMethod, RequestSpec, ResponseType, RetryOptions, ValidationError,
    ValidationField,
};
use crate::config::ClientConfig;
use crate::helpers::merge_base_url_and_endpoint_template;

/// A request whose inputs all passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The URL template, merged with the base URL.
    pub url: UrlTemplate,
    /// Stringified path parameter values.
    pub path_params: BTreeMap<String, String>,
    /// Normalized query parameters, `null`s dropped.
    pub query_params: Vec<(String, QueryValue)>,
    /// The encoded body, if any.
    pub body: Option<EncodedBody>,
    /// Caller headers, not yet merged with defaults.
    pub headers: HashMap<String, String>,
    /// How to decode the response body.
    pub response_type: ResponseType,
    /// The effective retry policy.
    pub retry_options: RetryOptions,
    /// The effective per-attempt timeout.
    pub timeout: Duration,
}

/// Validates every input of a request spec, in order, failing fast.
///
/// Relative URL templates are merged with the configured base URL first.
/// Unset timeouts and retry options take the configured defaults, which are
/// validated like caller-supplied values.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered. A relative URL with no
/// configured base URL fails on [`ValidationField::Url`] with
/// [`Constraint::MissingHost`].
pub fn validate_request(
    spec: &RequestSpec,
    config: &ClientConfig,
) -> Result<ValidatedRequest, ValidationError> {
    let endpoint = parse_url(&spec.url)?;
    let url = if endpoint.is_absolute() {
        endpoint
    } else if config.base_url().is_some() {
        parse_url(&merge_base_url_and_endpoint_template(
            config.base_url(),
            &endpoint.template,
        ))?
    } else {
        return Err(ValidationError::new(
            ValidationField::Url,
            Constraint::MissingHost,
            endpoint.template,
        ));
    };

    let path_params = parse_path_params(&url, &spec.path_params)?;
    let query_params = parse_query_params(&spec.query_params)?;
    let body = parse_request_body(spec.body.as_ref(), spec.body_type, &spec.headers)?;
    let retry_options = parse_retry_options(
        spec.retry_options
            .as_ref()
            .unwrap_or_else(|| config.default_retry_options()),
    )?;
    let timeout = parse_timeout(
        spec.timeout.unwrap_or_else(|| config.default_timeout()),
        config.max_timeout(),
    )?;

    Ok(ValidatedRequest {
        method: spec.method.clone(),
        url,
        path_params,
        query_params,
        body,
        headers: spec.headers.clone(),
        response_type: spec.response_type,
        retry_options,
        timeout,
    })
}

impl RequestSpec {
    /// Returns this spec in normalized form.
    ///
    /// The URL is merged with the base URL and trimmed, path parameters
    /// become strings, query values become strings or lists of strings with
    /// `null`s dropped, and the effective timeout and retry options are made
    /// explicit. Normalizing a normalized spec returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`], exactly as execution would.
    pub fn normalized(&self, config: &ClientConfig) -> Result<Self, ValidationError> {
        let validated = validate_request(self, config)?;

        Ok(Self {
            method: validated.method,
            url: validated.url.template,
            path_params: validated
                .path_params
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
            query_params: validated
                .query_params
                .iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
            body: self.body.clone(),
            body_type: self.body_type,
            response_type: validated.response_type,
            headers: validated.headers,
            timeout: Some(validated.timeout),
            retry_options: Some(validated.retry_options),
        })
    }
}
