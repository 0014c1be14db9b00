//! Configuration error types.
//!
//! Request-time failures live in [`crate::clients::ErrorRecord`]; this module
//! only covers mistakes made while building a [`crate::ClientConfig`] or a
//! transport.
//!
//! # Example
//!
//! ```rust
//! use http_alchemy::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Expected an absolute URL with scheme and host (e.g., 'https://api.example.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Timeout settings are inconsistent.
    #[error("Invalid timeout configuration: {reason}")]
    InvalidTimeout {
        /// Why the timeout settings were rejected.
        reason: String,
    },

    /// A default header could not be accepted.
    #[error("Invalid default header '{name}'. Header names must be non-empty and contain no whitespace.")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },

    /// The underlying HTTP transport could not be constructed.
    #[error("Failed to build HTTP transport: {reason}")]
    TransportBuild {
        /// The reason reported by the transport.
        reason: String,
    },
}
