//! Configuration types for the HTTP client.
//!
//! # Overview
//!
//! - [`ClientConfig`]: Immutable settings shared by every request a client makes
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`BaseUrl`]: A validated absolute base URL
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use http_alchemy::{BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .default_timeout(Duration::from_secs(10))
//!     .default_header("Accept", "application/json")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.default_timeout(), Duration::from_secs(10));
//! ```

mod newtypes;

pub use newtypes::BaseUrl;
pub(crate) use newtypes::{is_absolute_url, split_authority};

use std::collections::HashMap;
use std::time::Duration;

use crate::clients::RetryOptions;
use crate::error::ConfigError;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Timeout applied when a request does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper sanity bound for per-attempt timeouts.
pub const DEFAULT_MAX_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for an [`HttpClient`](crate::HttpClient).
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Option<BaseUrl>,
    default_headers: HashMap<String, String>,
    default_timeout: Duration,
    max_timeout: Duration,
    default_retry_options: RetryOptions,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the base URL, if configured.
    #[must_use]
    pub const fn base_url(&self) -> Option<&BaseUrl> {
        self.base_url.as_ref()
    }

    /// Returns the headers sent with every request unless overridden.
    ///
    /// Always contains a `User-Agent` entry.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the timeout used for requests that don't specify one.
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Returns the largest per-attempt timeout a request may ask for.
    #[must_use]
    pub const fn max_timeout(&self) -> Duration {
        self.max_timeout
    }

    /// Returns the retry options used for requests that don't specify any.
    #[must_use]
    pub const fn default_retry_options(&self) -> &RetryOptions {
        &self.default_retry_options
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent(None));
        Self {
            base_url: None,
            default_headers,
            default_timeout: DEFAULT_TIMEOUT,
            max_timeout: DEFAULT_MAX_TIMEOUT,
            default_retry_options: RetryOptions::default(),
            user_agent_prefix: None,
        }
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

fn user_agent(prefix: Option<&str>) -> String {
    let prefix = prefix.map_or(String::new(), |prefix| format!("{prefix} | "));
    let rust_version = env!("CARGO_PKG_RUST_VERSION");
    format!("{prefix}http-alchemy v{SDK_VERSION} | Rust {rust_version}")
}

/// Builder for constructing [`ClientConfig`] instances.
///
/// # Defaults
///
/// - `base_url`: `None` (endpoint templates must be absolute)
/// - `default_timeout`: 30 seconds
/// - `max_timeout`: 5 minutes
/// - `default_retry_options`: [`RetryOptions::default`] (no retries)
/// - `user_agent_prefix`: `None`
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use http_alchemy::{Backoff, ClientConfig, RetryOptions};
///
/// let config = ClientConfig::builder()
///     .default_retry_options(
///         RetryOptions::new(3).backoff(Backoff::exponential(Duration::from_millis(200))),
///     )
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
///
/// assert!(config.default_headers()["User-Agent"].starts_with("MyApp/1.0 | "));
/// ```
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<BaseUrl>,
    default_headers: HashMap<String, String>,
    default_timeout: Option<Duration>,
    max_timeout: Option<Duration>,
    default_retry_options: Option<RetryOptions>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL relative endpoint templates are resolved against.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Adds a single default header.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Sets all default headers at once.
    #[must_use]
    pub fn default_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.default_headers = headers;
        self
    }

    /// Sets the timeout used for requests that don't specify one.
    #[must_use]
    pub const fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Sets the upper bound enforced by the timeout validator.
    #[must_use]
    pub const fn max_timeout(mut self, timeout: Duration) -> Self {
        self.max_timeout = Some(timeout);
        self
    }

    /// Sets the retry options used for requests that don't specify any.
    #[must_use]
    pub fn default_retry_options(mut self, options: RetryOptions) -> Self {
        self.default_retry_options = Some(options);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] if `max_timeout` is zero or
    /// smaller than `default_timeout`, and [`ConfigError::InvalidHeader`] if a
    /// default header name is empty or contains whitespace.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let default_timeout = self.default_timeout.unwrap_or(DEFAULT_TIMEOUT);
        let max_timeout = self.max_timeout.unwrap_or(DEFAULT_MAX_TIMEOUT);

        if max_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                reason: "max_timeout must be greater than zero".to_string(),
            });
        }
        if default_timeout.is_zero() || default_timeout > max_timeout {
            return Err(ConfigError::InvalidTimeout {
                reason: format!(
                    "default_timeout {default_timeout:?} must be positive and at most max_timeout {max_timeout:?}"
                ),
            });
        }

        if let Some(name) = self
            .default_headers
            .keys()
            .find(|name| name.is_empty() || name.chars().any(char::is_whitespace))
        {
            return Err(ConfigError::InvalidHeader { name: name.clone() });
        }

        let mut default_headers = self.default_headers;
        if !default_headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("user-agent"))
        {
            default_headers.insert(
                "User-Agent".to_string(),
                user_agent(self.user_agent_prefix.as_deref()),
            );
        }

        Ok(ClientConfig {
            base_url: self.base_url,
            default_headers,
            default_timeout,
            max_timeout,
            default_retry_options: self.default_retry_options.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ClientConfig::builder().build().unwrap();

        assert!(config.base_url().is_none());
        assert_eq!(config.default_timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.max_timeout(), DEFAULT_MAX_TIMEOUT);
        assert_eq!(config.default_retry_options().max_attempts, 0);
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_default_matches_empty_builder() {
        let built = ClientConfig::builder().build().unwrap();
        let default = ClientConfig::default();

        assert_eq!(built.default_timeout(), default.default_timeout());
        assert_eq!(built.default_headers(), default.default_headers());
    }

    #[test]
    fn test_user_agent_header_format() {
        let config = ClientConfig::builder().build().unwrap();

        let user_agent = config.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("http-alchemy v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ClientConfig::builder()
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        let user_agent = config.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
    }

    #[test]
    fn test_explicit_user_agent_is_kept() {
        let config = ClientConfig::builder()
            .default_header("user-agent", "custom/2.0")
            .build()
            .unwrap();

        assert_eq!(
            config.default_headers().get("user-agent"),
            Some(&"custom/2.0".to_string())
        );
        assert!(!config.default_headers().contains_key("User-Agent"));
    }

    #[test]
    fn test_builder_rejects_zero_max_timeout() {
        let result = ClientConfig::builder().max_timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(ConfigError::InvalidTimeout { .. })));
    }

    #[test]
    fn test_builder_rejects_default_above_max() {
        let result = ClientConfig::builder()
            .default_timeout(Duration::from_secs(60))
            .max_timeout(Duration::from_secs(10))
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidTimeout { .. })));
    }

    #[test]
    fn test_builder_rejects_invalid_header_name() {
        let result = ClientConfig::builder()
            .default_header("X Bad", "value")
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidHeader { name }) if name == "X Bad"
        ));
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let base = BaseUrl::new("https://api.example.com").unwrap();
        let config = ClientConfig::builder()
            .base_url(base.clone())
            .default_header("Accept", "application/json")
            .default_timeout(Duration::from_secs(5))
            .max_timeout(Duration::from_secs(20))
            .default_retry_options(RetryOptions::new(2))
            .build()
            .unwrap();

        assert_eq!(config.base_url(), Some(&base));
        assert_eq!(config.default_timeout(), Duration::from_secs(5));
        assert_eq!(config.max_timeout(), Duration::from_secs(20));
        assert_eq!(config.default_retry_options().max_attempts, 2);
        assert_eq!(
            config.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientConfig>();
    }
}
