//! A stateful wrapper around [`HttpClient`] for long-lived consumers.
//!
//! [`HttpRequestHandler`] runs requests in the background and publishes
//! each transition as a fresh [`HandlerState`] snapshot. The most recent
//! trigger wins: starting a run aborts the previous one, and an outcome that
//! arrives after a newer trigger is discarded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::alchemy::{transmute, Failure};
use crate::clients::abort::AbortSignal;
use crate::clients::errors::{ErrorRecord, RequestError};
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::RequestSpec;
use crate::clients::http_response::HttpResponse;

/// The observable state of an [`HttpRequestHandler`].
#[derive(Clone, Debug, Default)]
pub enum HandlerState {
    /// Nothing has been triggered yet.
    #[default]
    Idle,
    /// A run is in progress.
    InFlight,
    /// The latest run succeeded.
    Succeeded(HttpResponse),
    /// The latest run failed or was aborted.
    Failed(ErrorRecord),
}

impl HandlerState {
    /// Returns `true` while a run is in progress.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    /// Returns the response of a successful run.
    #[must_use]
    pub const fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Succeeded(response) => Some(response),
            _ => None,
        }
    }

    /// Returns the error of a failed run.
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Runs requests in the background and tracks the latest outcome.
///
/// State moves `Idle → InFlight → Succeeded | Failed` and never returns to
/// `Idle`. Every transition replaces the whole snapshot, so readers never see
/// a partial update.
///
/// # Thread Safety
///
/// `HttpRequestHandler` is `Send + Sync`; share it behind an `Arc` to
/// trigger from several tasks.
///
/// # Example
///
/// ```rust,ignore
/// use http_alchemy::{HttpMethod, HttpRequestHandler, RequestSpec};
///
/// let handler = HttpRequestHandler::new(client);
/// let mut updates = handler.subscribe();
///
/// handler.trigger(RequestSpec::builder(HttpMethod::Get, "/me").build());
/// updates.wait_for(|state| state.response().is_some() || state.error().is_some()).await?;
///
/// if let Some(response) = handler.state().response() {
///     println!("{}", response.body);
/// }
/// ```
#[derive(Debug)]
pub struct HttpRequestHandler {
    client: HttpClient,
    state: Arc<watch::Sender<HandlerState>>,
    current: Arc<Mutex<CurrentRun>>,
}

/// The run whose outcome may still be published.
///
/// Every state write happens while this lock is held, so swapping the abort
/// signal, bumping the generation and publishing are one step.
#[derive(Debug, Default)]
struct CurrentRun {
    generation: u64,
    signal: Option<AbortSignal>,
}

fn lock(current: &Mutex<CurrentRun>) -> MutexGuard<'_, CurrentRun> {
    current.lock().unwrap_or_else(PoisonError::into_inner)
}

// Verify HttpRequestHandler is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpRequestHandler>();
    assert_send_sync::<HandlerState>();
};

impl HttpRequestHandler {
    /// Creates an idle handler around a client.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        let (state, _) = watch::channel(HandlerState::Idle);
        Self {
            client,
            state: Arc::new(state),
            current: Arc::new(Mutex::new(CurrentRun::default())),
        }
    }

    /// Starts a run for `spec`, aborting any run in progress.
    ///
    /// The state becomes [`HandlerState::InFlight`] before this returns. The
    /// returned handle completes once the run's outcome has been published
    /// or discarded.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn trigger(&self, spec: RequestSpec) -> JoinHandle<()> {
        let signal = AbortSignal::new();
        let generation = {
            let mut current = lock(&self.current);
            if let Some(previous) = current.signal.replace(signal.clone()) {
                previous.abort();
            }
            current.generation += 1;
            self.state.send_replace(HandlerState::InFlight);
            current.generation
        };
        tracing::debug!(generation, "request handler triggered");

        let client = self.client.clone();
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.current);

        tokio::spawn(async move {
            let run = tokio::spawn(async move { client.execute_with_abort(spec, &signal).await });
            let outcome = match run.await {
                Ok(Ok(response)) => HandlerState::Succeeded(response),
                Ok(Err(error)) => HandlerState::Failed(error),
                Err(join_error) => {
                    HandlerState::Failed(transmute(Failure::Other(Arc::new(join_error))))
                }
            };

            let mut current = lock(&current);
            if current.generation == generation {
                current.signal = None;
                state.send_replace(outcome);
            } else {
                tracing::debug!(generation, "discarding outcome of superseded run");
            }
        })
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> HandlerState {
        self.state.borrow().clone()
    }

    /// Returns a receiver that observes every state snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HandlerState> {
        self.state.subscribe()
    }

    /// Aborts the run in progress, if any.
    ///
    /// The state becomes [`HandlerState::Failed`] with an aborted
    /// [`RequestError`] immediately; the run's own outcome is discarded.
    pub fn abort(&self) {
        let mut current = lock(&self.current);
        let Some(signal) = current.signal.take() else {
            return;
        };

        let in_flight = self.state.borrow().is_in_flight();
        if in_flight {
            current.generation += 1;
            self.state
                .send_replace(HandlerState::Failed(RequestError::aborted().into()));
        }
        signal.abort();
        drop(current);
        tracing::debug!("request handler aborted");
    }
}
