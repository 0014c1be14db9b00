//! Validated newtype wrappers for configuration values.
//!
//! Invalid values are rejected on construction with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated absolute base URL.
///
/// Relative endpoint templates are resolved against this URL. The stored
/// value never ends with a slash, and it cannot contain placeholder braces,
/// so every placeholder in a merged template comes from the endpoint.
///
/// # Example
///
/// ```rust
/// use http_alchemy::BaseUrl;
///
/// let url = BaseUrl::new("https://api.example.com/v1/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.example.com/v1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no scheme, has
    /// an empty host, or contains `{` / `}`.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidBaseUrl { url: url.clone() };

        if url.contains(['{', '}']) || url.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        if split_authority(&url).is_none() {
            return Err(invalid());
        }

        Ok(Self { url })
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Returns the byte offset of `://` when `url` starts with a scheme.
///
/// Only a `://` that precedes every `/`, `?` and `#` counts, so a relative
/// URL carrying an absolute URL in its query stays relative. The scheme
/// itself is not checked here.
fn scheme_end(url: &str) -> Option<usize> {
    let separator = url.find("://")?;
    (!url[..separator].contains(['/', '?', '#'])).then_some(separator)
}

/// Returns `true` when `url` starts with a scheme.
pub(crate) fn is_absolute_url(url: &str) -> bool {
    scheme_end(url).is_some()
}

/// Locates the scheme and host of an absolute URL.
///
/// Returns `(scheme_end, host_start, host_end)` byte offsets, or `None` when
/// the scheme is missing or non-alphabetic, or the host is empty.
pub(crate) fn split_authority(url: &str) -> Option<(usize, usize, usize)> {
    let scheme_end = scheme_end(url)?;

    let scheme = &url[..scheme_end];
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let host_start = scheme_end + 3;
    if host_start >= url.len() {
        return None;
    }

    // Host ends at port, path, query, or end of string
    let remainder = &url[host_start..];
    let host_end = remainder
        .find([':', '/', '?', '#'])
        .map_or(url.len(), |i| host_start + i);

    if host_end == host_start {
        return None;
    }

    Some((scheme_end, host_start, host_end))
}
