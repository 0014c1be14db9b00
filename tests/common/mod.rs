//! Shared helpers for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use http_alchemy::{
    BaseUrl, ClientConfig, HttpClient, RawResponse, RawTransportError, Transport,
    TransportRequest,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted transport reaction.
#[derive(Clone, Debug)]
pub enum Step {
    /// Return this response.
    Respond(RawResponse),
    /// Return this response after a delay.
    Delayed(Duration, RawResponse),
    /// Fail with this error.
    Fail(RawTransportError),
    /// Never complete.
    Hang,
}

/// A transport that replays a script, repeating the final step forever.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into_iter().collect()),
            ..Self::default()
        })
    }

    /// Number of times `send` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_step(&self) -> Step {
        let mut steps = self.steps.lock().unwrap();
        if steps.len() > 1 {
            steps.pop_front().unwrap()
        } else {
            steps.front().cloned().expect("script must not be empty")
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, RawTransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        match self.next_step() {
            Step::Respond(response) => Ok(response),
            Step::Delayed(delay, response) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            Step::Fail(error) => Err(error),
            Step::Hang => std::future::pending().await,
        }
    }
}

/// A JSON response with the given status and body.
pub fn json_response(status: u16, body: &str) -> RawResponse {
    response_with_headers(status, &[("content-type", "application/json")], body)
}

/// A response with explicit headers.
pub fn response_with_headers(status: u16, headers: &[(&str, &str)], body: &str) -> RawResponse {
    let headers: HashMap<String, Vec<String>> = headers
        .iter()
        .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
        .collect();
    RawResponse::new(status, headers, body.as_bytes().to_vec())
}

/// Config with `https://api.example.com` as base URL.
pub fn config() -> ClientConfig {
    ClientConfig::builder()
        .base_url(BaseUrl::new("https://api.example.com").unwrap())
        .build()
        .unwrap()
}

/// A client on top of a scripted transport.
pub fn client(transport: &Arc<ScriptedTransport>) -> HttpClient {
    HttpClient::with_transport(config(), Arc::clone(transport))
}
