//! Retry policy types.
//!
//! [`RetryOptions`] decides how many times a failed request is retried, which
//! failures qualify, and how long to wait in between.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::clients::errors::ErrorKind;

/// Status codes retried by default.
pub const DEFAULT_RETRY_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Upper bound on honored `Retry-After` waits.
pub const DEFAULT_MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Delay strategy between retry attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backoff {
    /// Wait the same delay before every retry.
    Fixed(Duration),
    /// Wait `base × 2^(retry − 1)`, optionally capped.
    Exponential {
        /// Delay before the first retry.
        base: Duration,
        /// Largest delay ever waited.
        cap: Option<Duration>,
        /// Randomize each delay within `[delay / 2, delay]`.
        jitter: bool,
    },
}

impl Backoff {
    /// Creates an uncapped exponential backoff without jitter.
    #[must_use]
    pub const fn exponential(base: Duration) -> Self {
        Self::Exponential {
            base,
            cap: None,
            jitter: false,
        }
    }

    /// Returns the delay before the given retry (1 for the first retry).
    ///
    /// This is a pure function of the retry number and the strategy; jitter
    /// is applied separately by the caller.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        match *self {
            Self::Fixed(delay) => delay,
            Self::Exponential { base, cap, .. } => {
                let factor = 2u32.saturating_pow(retry.saturating_sub(1));
                let delay = base.saturating_mul(factor);
                cap.map_or(delay, |cap| delay.min(cap))
            }
        }
    }

    /// Returns `true` if delays should be randomized.
    #[must_use]
    pub const fn has_jitter(&self) -> bool {
        matches!(self, Self::Exponential { jitter: true, .. })
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Fixed(Duration::from_secs(1))
    }
}

/// Retry policy for a request.
///
/// `max_attempts` counts retries, so a permanently failing request is sent
/// `max_attempts + 1` times; `0` means "send once".
///
/// A failure is retried when attempts remain and either
/// - it is a response error whose status is in `retry_statuses`, or
/// - its kind is in `retry_kinds`.
///
/// Validation errors, unknown errors and aborted runs are never retried.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use http_alchemy::{Backoff, ErrorKind, RetryOptions};
///
/// let options = RetryOptions::new(3)
///     .backoff(Backoff::exponential(Duration::from_millis(100)))
///     .retry_statuses([503])
///     .retry_kinds([ErrorKind::Request, ErrorKind::Transport]);
///
/// assert_eq!(options.backoff.delay_for(3), Duration::from_millis(400));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryOptions {
    /// Number of retries after the first attempt.
    pub max_attempts: u32,
    /// Delay strategy between attempts.
    pub backoff: Backoff,
    /// Response statuses that qualify for a retry.
    pub retry_statuses: BTreeSet<u16>,
    /// Error kinds that qualify for a retry regardless of status.
    pub retry_kinds: BTreeSet<ErrorKind>,
    /// Wait for the response's `Retry-After` instead of the backoff delay.
    pub respect_retry_after: bool,
    /// Longest `Retry-After` wait that is honored.
    pub max_retry_after: Duration,
}

impl RetryOptions {
    /// Creates retry options with the given retry budget and default policy.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Sets the backoff strategy.
    #[must_use]
    pub const fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replaces the set of retryable statuses.
    #[must_use]
    pub fn retry_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.retry_statuses = statuses.into_iter().collect();
        self
    }

    /// Replaces the set of retryable error kinds.
    #[must_use]
    pub fn retry_kinds(mut self, kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        self.retry_kinds = kinds.into_iter().collect();
        self
    }

    /// Sets whether `Retry-After` response headers are honored.
    #[must_use]
    pub const fn respect_retry_after(mut self, respect: bool) -> Self {
        self.respect_retry_after = respect;
        self
    }

    /// Sets the longest honored `Retry-After` wait.
    #[must_use]
    pub const fn max_retry_after(mut self, max: Duration) -> Self {
        self.max_retry_after = max;
        self
    }
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            backoff: Backoff::default(),
            retry_statuses: DEFAULT_RETRY_STATUSES.into_iter().collect(),
            retry_kinds: BTreeSet::from([ErrorKind::Request]),
            respect_retry_after: true,
            max_retry_after: DEFAULT_MAX_RETRY_AFTER,
        }
    }
}
