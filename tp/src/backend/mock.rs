//! Scripted backend for unit tests
//!
//! Responses are consumed in call order. A response may be held behind a gate so
//! tests can control the order in which concurrent calls complete.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::debug;

use super::{BackendError, ChatRequest, TripBackend};
use crate::domain::TripResult;

struct Scripted<T> {
    outcome: Result<T, BackendError>,
    gate: Option<oneshot::Receiver<()>>,
    panics: bool,
}

impl<T> Scripted<T> {
    fn ready(outcome: Result<T, BackendError>) -> Self {
        Self { outcome, gate: None, panics: false }
    }

    fn gated(outcome: Result<T, BackendError>, gate: oneshot::Receiver<()>) -> Self {
        Self { outcome, gate: Some(gate), panics: false }
    }

    fn panicking() -> Self {
        Self {
            outcome: Err(BackendError::Malformed("unreachable".to_string())),
            gate: None,
            panics: true,
        }
    }
}

/// Mock backend with queued plan and chat outcomes
#[derive(Default)]
pub struct MockBackend {
    plans: Mutex<VecDeque<Scripted<TripResult>>>,
    chats: Mutex<VecDeque<Scripted<String>>>,
    plan_calls: AtomicUsize,
    chat_calls: AtomicUsize,
    chat_requests: Mutex<Vec<ChatRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plan outcome that resolves immediately
    pub fn push_plan(&self, outcome: Result<TripResult, BackendError>) {
        self.plans.lock().unwrap().push_back(Scripted::ready(outcome));
    }

    /// Queue a plan outcome that resolves when the returned sender fires (or drops)
    pub fn push_gated_plan(&self, outcome: Result<TripResult, BackendError>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.plans.lock().unwrap().push_back(Scripted::gated(outcome, rx));
        tx
    }

    /// Queue a chat outcome that resolves immediately
    pub fn push_chat(&self, outcome: Result<String, BackendError>) {
        self.chats.lock().unwrap().push_back(Scripted::ready(outcome));
    }

    /// Queue a chat outcome that resolves when the returned sender fires (or drops)
    pub fn push_gated_chat(&self, outcome: Result<String, BackendError>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.chats.lock().unwrap().push_back(Scripted::gated(outcome, rx));
        tx
    }

    /// Queue a plan call that panics inside the backend
    pub fn push_panicking_plan(&self) {
        self.plans.lock().unwrap().push_back(Scripted::panicking());
    }

    /// Queue a chat call that panics inside the backend
    pub fn push_panicking_chat(&self) {
        self.chats.lock().unwrap().push_back(Scripted::panicking());
    }

    pub fn plan_calls(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst)
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    /// Every chat request received so far
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    async fn resolve<T>(scripted: Option<Scripted<T>>) -> Result<T, BackendError> {
        match scripted {
            Some(Scripted { outcome, gate, panics }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                if panics {
                    panic!("MockBackend: scripted panic");
                }
                outcome
            }
            None => {
                debug!("MockBackend: no more scripted responses");
                Err(BackendError::Malformed("No more mock responses".to_string()))
            }
        }
    }
}

#[async_trait]
impl TripBackend for MockBackend {
    async fn plan_trip(&self, destination: &str) -> Result<TripResult, BackendError> {
        debug!(%destination, "MockBackend::plan_trip: called");
        self.plan_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.plans.lock().unwrap().pop_front();
        Self::resolve(scripted).await
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, BackendError> {
        debug!(message = %request.message, "MockBackend::chat: called");
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.chat_requests.lock().unwrap().push(request);
        let scripted = self.chats.lock().unwrap().pop_front();
        Self::resolve(scripted).await
    }
}

/// A minimal successful result for `destination`
pub fn trip(destination: &str) -> TripResult {
    TripResult {
        destination: destination.to_string(),
        final_itinerary: format!("Day 1: Explore {}", destination),
        ..TripResult::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_in_order() {
        let backend = MockBackend::new();
        backend.push_plan(Ok(trip("Oslo")));
        backend.push_plan(Err(BackendError::Malformed("bad".to_string())));

        assert_eq!(backend.plan_trip("Oslo").await.unwrap().destination, "Oslo");
        assert!(backend.plan_trip("Bergen").await.is_err());
        assert!(backend.plan_trip("Exhausted").await.is_err());
        assert_eq!(backend.plan_calls(), 3);
    }

    #[tokio::test]
    async fn test_gated_chat_waits_for_gate() {
        let backend = std::sync::Arc::new(MockBackend::new());
        let gate = backend.push_gated_chat(Ok("later".to_string()));

        let b = backend.clone();
        let handle = tokio::spawn(async move {
            b.chat(ChatRequest {
                message: "q".to_string(),
                context: None,
            })
            .await
        });

        tokio::task::yield_now().await;
        assert!(!handle.is_finished());
        gate.send(()).unwrap();
        assert_eq!(handle.await.unwrap().unwrap(), "later");
        assert_eq!(backend.chat_requests().len(), 1);
    }
}
