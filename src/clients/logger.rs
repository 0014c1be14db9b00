//! The logging boundary.
//!
//! The orchestrator reports each attempt and outcome as a [`LogRecord`] to a
//! [`RequestLogger`]. Logging is fire-and-forget: loggers return nothing and
//! cannot influence the run.

use serde::Serialize;

use crate::clients::errors::ErrorKind;

/// Where in a run a record was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogPhase {
    /// Request validation.
    Validation,
    /// A transport attempt.
    Attempt,
    /// The wait before a retry.
    Retry,
    /// The end of the run.
    Complete,
}

/// What happened in the phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogOutcome {
    /// The phase started.
    Started,
    /// The phase succeeded.
    Succeeded,
    /// The phase failed and another attempt follows.
    Retrying,
    /// The phase failed for good.
    Failed,
    /// The run was aborted.
    Aborted,
}

/// A structured record of one step of a request run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// The phase the record belongs to.
    pub phase: LogPhase,
    /// The 1-based attempt number, 0 before the first attempt.
    pub attempt: u32,
    /// What happened.
    pub outcome: LogOutcome,
    /// The error kind, for failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl LogRecord {
    /// Creates a record without an error kind.
    #[must_use]
    pub const fn new(phase: LogPhase, attempt: u32, outcome: LogOutcome) -> Self {
        Self {
            phase,
            attempt,
            outcome,
            error_kind: None,
        }
    }

    /// Attaches the error kind.
    #[must_use]
    pub const fn with_error_kind(mut self, kind: ErrorKind) -> Self {
        self.error_kind = Some(kind);
        self
    }
}

/// Receives structured records of request runs.
pub trait RequestLogger: Send + Sync {
    /// Handles a record.
    fn log(&self, record: &LogRecord);
}

/// Emits records as `tracing` events.
///
/// Progress is logged at `debug`, retries at `warn` and terminal failures at
/// `error`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl RequestLogger for TracingLogger {
    fn log(&self, record: &LogRecord) {
        let error_kind = record.error_kind.map(|kind| kind.as_str());
        match record.outcome {
            LogOutcome::Retrying => tracing::warn!(
                phase = ?record.phase,
                attempt = record.attempt,
                error_kind,
                "request attempt failed, retrying"
            ),
            LogOutcome::Failed => tracing::error!(
                phase = ?record.phase,
                attempt = record.attempt,
                error_kind,
                "request failed"
            ),
            LogOutcome::Started | LogOutcome::Succeeded | LogOutcome::Aborted => tracing::debug!(
                phase = ?record.phase,
                attempt = record.attempt,
                outcome = ?record.outcome,
                error_kind,
                "request progress"
            ),
        }
    }
}

/// Discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;

impl RequestLogger for NoopLogger {
    fn log(&self, _record: &LogRecord) {}
}
