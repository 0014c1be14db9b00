//! Retry options validation.

use crate::clients::{Backoff, Constraint, RetryOptions, ValidationError, ValidationField};

/// Largest accepted retry budget.
pub const MAX_RETRY_ATTEMPTS: u32 = 100;

/// Validates retry options.
///
/// # Errors
///
/// Returns a [`ValidationError`] on [`ValidationField::RetryOptions`] if the
/// budget exceeds [`MAX_RETRY_ATTEMPTS`], an exponential base delay is zero,
/// a cap is below its base, or a retry status is not a valid HTTP status.
pub fn parse_retry_options(options: &RetryOptions) -> Result<RetryOptions, ValidationError> {
    let fail = |constraint, key: &str, value: String| {
        ValidationError::new(ValidationField::RetryOptions, constraint, value).with_key(key)
    };

    if options.max_attempts > MAX_RETRY_ATTEMPTS {
        return Err(fail(
            Constraint::ExceedsMaximum {
                max: MAX_RETRY_ATTEMPTS.to_string(),
            },
            "max_attempts",
            options.max_attempts.to_string(),
        ));
    }

    if let Backoff::Exponential { base, cap, .. } = options.backoff {
        if base.is_zero() {
            return Err(fail(Constraint::NotPositive, "backoff", format!("{base:?}")));
        }
        if let Some(cap) = cap.filter(|cap| *cap < base) {
            return Err(fail(Constraint::CapBelowBase, "backoff", format!("{cap:?}")));
        }
    }

    if let Some(status) = options
        .retry_statuses
        .iter()
        .find(|status| !(100..=599).contains(*status))
    {
        return Err(fail(
            Constraint::InvalidStatus,
            "retry_statuses",
            status.to_string(),
        ));
    }

    Ok(options.clone())
}
