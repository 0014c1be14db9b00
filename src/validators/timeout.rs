//! Timeout validation.

use std::time::Duration;

use crate::clients::{Constraint, ValidationError, ValidationField};

/// Validates a per-attempt timeout against an upper sanity bound.
///
/// # Errors
///
/// Returns a [`ValidationError`] on [`ValidationField::Timeout`] if the
/// timeout is zero or exceeds `max`.
pub fn parse_timeout(timeout: Duration, max: Duration) -> Result<Duration, ValidationError> {
    if timeout.is_zero() {
        return Err(ValidationError::new(
            ValidationField::Timeout,
            Constraint::NotPositive,
            format!("{timeout:?}"),
        ));
    }
    if timeout > max {
        return Err(ValidationError::new(
            ValidationField::Timeout,
            Constraint::ExceedsMaximum {
                max: format!("{max:?}"),
            },
            format!("{timeout:?}"),
        ));
    }
    Ok(timeout)
}
