//! Cooperative cancellation for request runs.

use std::sync::Arc;

use tokio::sync::watch;

/// A shareable flag that aborts the runs watching it.
///
/// Clones share the same flag. Once aborted, a signal stays aborted.
///
/// # Example
///
/// ```rust
/// use http_alchemy::AbortSignal;
///
/// let signal = AbortSignal::new();
/// let watcher = signal.clone();
/// signal.abort();
/// assert!(watcher.is_aborted());
/// ```
#[derive(Clone, Debug)]
pub struct AbortSignal {
    flag: Arc<watch::Sender<bool>>,
}

impl AbortSignal {
    /// Creates a signal that has not been aborted.
    #[must_use]
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    /// Aborts every run watching this signal.
    pub fn abort(&self) {
        self.flag.send_replace(true);
    }

    /// Returns `true` once [`abort`](Self::abort) has been called.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        *self.flag.borrow()
    }

    /// Completes when the signal is aborted.
    pub async fn aborted(&self) {
        let mut rx = self.flag.subscribe();
        if rx.wait_for(|aborted| *aborted).await.is_err() {
            // The sender lives as long as `self`, so this is unreachable.
            std::future::pending::<()>().await;
        }
    }
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}
