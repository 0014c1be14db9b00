//! HTTP response types.
//!
//! This module provides the [`HttpResponse`] type returned by successful
//! requests and carried by response errors.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clients::transport::RawResponse;

/// A decoded HTTP response.
///
/// Immutable once constructed. Header names are lowercase and may carry
/// several values. The undecoded response is kept in [`raw`](Self::raw) for
/// diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The decoded response body.
    pub body: serde_json::Value,
    /// The response exactly as the transport returned it.
    pub raw: RawResponse,
}

impl HttpResponse {
    /// Creates a response from a raw transport response and its decoded body.
    #[must_use]
    pub fn new(raw: RawResponse, body: serde_json::Value) -> Self {
        Self {
            status: raw.status,
            headers: raw.headers.clone(),
            body,
            raw,
        }
    }

    /// Creates a response from individual parts.
    #[must_use]
    pub fn from_parts(
        status: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
        raw_body: Vec<u8>,
    ) -> Self {
        Self::new(RawResponse::new(status, headers, raw_body), body)
    }

    /// Returns `true` if the status code is 2xx.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.raw.header(name)
    }

    /// Returns the request ID from the `X-Request-Id` header.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns how long the server asked clients to wait before retrying.
    ///
    /// Reads the `Retry-After` header as either delay-seconds or an HTTP
    /// date. Dates in the past yield a zero wait.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        parse_retry_after(self.header("retry-after")?, Utc::now())
    }
}

fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<f64>() {
        if !(seconds.is_finite() && seconds >= 0.0) {
            return None;
        }
        // Waits too long for a Duration saturate; callers clamp them.
        return Some(Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX));
    }

    let date = DateTime::parse_from_rfc2822(value).ok()?;
    let wait = date.with_timezone(&Utc) - now;
    Some(wait.to_std().unwrap_or(Duration::ZERO))
}
