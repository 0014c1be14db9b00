//! Error alchemy: classifying failures and deciding on retries.
//!
//! Every failure caught during an attempt goes through [`transmute`], which
//! turns it into exactly one [`ErrorRecord`]. [`ErrorAlchemy`] then checks
//! the record against the request's [`RetryOptions`] and either schedules
//! another attempt or settles on the record as the final error.

mod transmuter;

pub use transmuter::{transmute, Failure};

use std::time::Duration;

use rand::Rng;

use crate::clients::{ErrorKind, ErrorRecord, RetryOptions};

/// The outcome of assessing a failed attempt.
#[derive(Debug, Clone)]
pub enum Verdict {
    /// Wait `delay`, then attempt again.
    Retry {
        /// The classified failure of the attempt just made.
        error: ErrorRecord,
        /// How long to wait before the next attempt.
        delay: Duration,
    },
    /// Stop and return the error to the caller as is.
    Fail(ErrorRecord),
}

/// Retry decisions for one request run.
#[derive(Debug, Clone, Copy)]
pub struct ErrorAlchemy<'a> {
    options: &'a RetryOptions,
}

impl<'a> ErrorAlchemy<'a> {
    /// Creates an alchemy bound to a retry policy.
    #[must_use]
    pub const fn new(options: &'a RetryOptions) -> Self {
        Self { options }
    }

    /// Classifies the failure of attempt number `attempt` (1-based) and
    /// decides whether to retry.
    ///
    /// A retry is granted while fewer than `max_attempts` retries have been
    /// used and [`is_retryable`](Self::is_retryable) holds.
    #[must_use]
    pub fn assess(&self, failure: Failure, attempt: u32) -> Verdict {
        let error = transmute(failure);
        if attempt > self.options.max_attempts || !self.is_retryable(&error) {
            return Verdict::Fail(error);
        }
        let delay = self.delay_for(&error, attempt);
        Verdict::Retry { error, delay }
    }

    /// Returns `true` if the retry predicate accepts the error, ignoring the
    /// remaining budget.
    ///
    /// Response errors qualify by status or by [`ErrorKind::Response`] being
    /// listed; request and transport errors qualify by kind. Aborts,
    /// validation errors and unknown errors never qualify.
    #[must_use]
    pub fn is_retryable(&self, error: &ErrorRecord) -> bool {
        let kinds = &self.options.retry_kinds;
        match error {
            ErrorRecord::Validation(_) | ErrorRecord::Unknown(_) => false,
            ErrorRecord::Request(_) if error.is_aborted() => false,
            ErrorRecord::Request(_) => kinds.contains(&ErrorKind::Request),
            ErrorRecord::Transport(_) => kinds.contains(&ErrorKind::Transport),
            ErrorRecord::Response(e) => {
                kinds.contains(&ErrorKind::Response) || self.options.retry_statuses.contains(&e.status)
            }
        }
    }

    /// Returns the wait before the retry that follows attempt `attempt`.
    ///
    /// A `Retry-After` on the response wins when honored, clamped to
    /// `max_retry_after`. Otherwise the backoff delay is used, jittered into
    /// `[delay / 2, delay]` when the backoff asks for it.
    #[must_use]
    pub fn delay_for(&self, error: &ErrorRecord, attempt: u32) -> Duration {
        if self.options.respect_retry_after {
            if let Some(wait) = error.response().and_then(|r| r.retry_after()) {
                return wait.min(self.options.max_retry_after);
            }
        }

        let delay = self.options.backoff.delay_for(attempt);
        if self.options.backoff.has_jitter() && !delay.is_zero() {
            rand::thread_rng().gen_range(delay / 2..=delay)
        } else {
            delay
        }
    }
}
