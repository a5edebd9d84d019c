//! Result store: the single source of truth for the current trip request
//!
//! `submit` changes state synchronously and spawns the backend call; the
//! completion comes back over a channel and is applied by `poll` or `settle`.
//! Every submit bumps a generation counter and completions carrying an older
//! generation are dropped, so a slow response can never overwrite a newer one.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::backend::{BackendError, TripBackend, supervised};
use crate::domain::TripResult;

/// Lifecycle of the current request, with its payload
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestLifecycle {
    #[default]
    Idle,
    Loading,
    Succeeded(Arc<TripResult>),
    Failed(String),
}

/// Payload-free view of [`RequestLifecycle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl RequestLifecycle {
    pub fn status(&self) -> RequestStatus {
        match self {
            RequestLifecycle::Idle => RequestStatus::Idle,
            RequestLifecycle::Loading => RequestStatus::Loading,
            RequestLifecycle::Succeeded(_) => RequestStatus::Succeeded,
            RequestLifecycle::Failed(_) => RequestStatus::Failed,
        }
    }
}

#[derive(Debug)]
struct Completion {
    generation: u64,
    outcome: Result<TripResult, BackendError>,
}

pub struct ResultStore {
    backend: Arc<dyn TripBackend>,
    generation: u64,
    destination: Option<String>,
    lifecycle: RequestLifecycle,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl ResultStore {
    pub fn new(backend: Arc<dyn TripBackend>) -> Self {
        debug!("ResultStore::new: called");
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            generation: 0,
            destination: None,
            lifecycle: RequestLifecycle::Idle,
            tx,
            rx,
        }
    }

    /// Start planning a trip to `destination`; returns the request generation
    ///
    /// The caller validates the destination. Must be called inside a tokio runtime.
    pub fn submit(&mut self, destination: &str) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        debug!(%destination, generation, "ResultStore::submit: called");

        self.destination = Some(destination.to_string());
        self.lifecycle = RequestLifecycle::Loading;

        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let destination = destination.to_string();
        tokio::spawn(async move {
            let outcome = supervised(async move { backend.plan_trip(&destination).await }).await;
            debug!(generation, ok = outcome.is_ok(), "ResultStore: backend call finished");
            // Receiver gone means the store was dropped
            let _ = tx.send(Completion { generation, outcome });
        });

        generation
    }

    /// Apply every completion that has arrived; returns true if state changed
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.rx.try_recv() {
            changed |= self.apply(completion);
        }
        changed
    }

    /// Wait until the current request is no longer loading
    pub async fn settle(&mut self) -> RequestStatus {
        debug!(generation = self.generation, "ResultStore::settle: called");
        self.poll();
        while self.is_loading() {
            match self.rx.recv().await {
                Some(completion) => {
                    self.apply(completion);
                }
                None => break,
            }
        }
        self.status()
    }

    fn apply(&mut self, completion: Completion) -> bool {
        if completion.generation != self.generation {
            debug!(
                stale = completion.generation,
                current = self.generation,
                "ResultStore::apply: discarding stale completion"
            );
            return false;
        }

        self.lifecycle = match completion.outcome {
            Ok(result) => {
                info!(
                    destination = %result.destination,
                    places = result.places.len(),
                    restaurants = result.restaurants.len(),
                    structured = result.structured_itinerary.is_some(),
                    "ResultStore: trip planned"
                );
                RequestLifecycle::Succeeded(Arc::new(result))
            }
            Err(e) => {
                warn!(error = %e, "ResultStore: trip planning failed");
                RequestLifecycle::Failed(e.user_message())
            }
        };
        true
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Destination of the latest submit
    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn lifecycle(&self) -> &RequestLifecycle {
        &self.lifecycle
    }

    pub fn status(&self) -> RequestStatus {
        self.lifecycle.status()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.lifecycle, RequestLifecycle::Loading)
    }

    pub fn result(&self) -> Option<Arc<TripResult>> {
        match &self.lifecycle {
            RequestLifecycle::Succeeded(result) => Some(result.clone()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.lifecycle {
            RequestLifecycle::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{MockBackend, trip};
    use std::time::Duration;

    fn store_with(backend: &Arc<MockBackend>) -> ResultStore {
        ResultStore::new(backend.clone())
    }

    async fn wait_for_calls(backend: &MockBackend, calls: usize) {
        while backend.plan_calls() < calls {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let backend = Arc::new(MockBackend::new());
        let store = store_with(&backend);
        assert_eq!(store.status(), RequestStatus::Idle);
        assert!(store.result().is_none());
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_submit_is_loading_then_succeeds() {
        let backend = Arc::new(MockBackend::new());
        backend.push_plan(Ok(trip("Paris")));
        let mut store = store_with(&backend);

        let generation = store.submit("Paris");
        assert_eq!(generation, 1);
        assert_eq!(store.status(), RequestStatus::Loading);
        assert_eq!(store.destination(), Some("Paris"));

        assert_eq!(store.settle().await, RequestStatus::Succeeded);
        assert_eq!(store.result().unwrap().destination, "Paris");
        assert_eq!(backend.plan_calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_sets_message() {
        let backend = Arc::new(MockBackend::new());
        backend.push_plan(Err(BackendError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR)));
        let mut store = store_with(&backend);

        store.submit("Atlantis");
        assert_eq!(store.settle().await, RequestStatus::Failed);
        assert_eq!(store.error(), Some("Error: Internal Server Error"));
        assert!(store.result().is_none());
    }

    #[tokio::test]
    async fn test_submit_clears_previous_outcome() {
        let backend = Arc::new(MockBackend::new());
        backend.push_plan(Err(BackendError::Malformed("eof".to_string())));
        let gate = backend.push_gated_plan(Ok(trip("Rome")));
        let mut store = store_with(&backend);

        store.submit("Nowhere");
        store.settle().await;
        assert!(store.error().is_some());

        store.submit("Rome");
        assert!(store.error().is_none());
        assert!(store.result().is_none());
        assert!(store.is_loading());

        gate.send(()).unwrap();
        assert_eq!(store.settle().await, RequestStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_late_stale_response_is_discarded() {
        let backend = Arc::new(MockBackend::new());
        let first = backend.push_gated_plan(Ok(trip("Old")));
        let second = backend.push_gated_plan(Ok(trip("New")));
        let mut store = store_with(&backend);

        store.submit("Old");
        wait_for_calls(&backend, 1).await;
        store.submit("New");
        wait_for_calls(&backend, 2).await;

        second.send(()).unwrap();
        assert_eq!(store.settle().await, RequestStatus::Succeeded);
        assert_eq!(store.result().unwrap().destination, "New");

        first.send(()).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!store.poll());
        assert_eq!(store.result().unwrap().destination, "New");
    }

    #[tokio::test]
    async fn test_early_stale_response_does_not_end_loading() {
        let backend = Arc::new(MockBackend::new());
        let first = backend.push_gated_plan(Err(BackendError::Malformed("old".to_string())));
        let second = backend.push_gated_plan(Ok(trip("New")));
        let mut store = store_with(&backend);

        store.submit("Old");
        wait_for_calls(&backend, 1).await;
        store.submit("New");
        wait_for_calls(&backend, 2).await;

        first.send(()).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        store.poll();
        assert!(store.is_loading());

        second.send(()).unwrap();
        assert_eq!(store.settle().await, RequestStatus::Succeeded);
        assert_eq!(store.generation(), 2);
    }

    #[tokio::test]
    async fn test_panicking_backend_fails_request() {
        let backend = Arc::new(MockBackend::new());
        backend.push_panicking_plan();
        backend.push_plan(Ok(trip("Rome")));
        let mut store = store_with(&backend);

        store.submit("Rome");
        let status = tokio::time::timeout(Duration::from_secs(2), store.settle())
            .await
            .expect("settle after panic");
        assert_eq!(status, RequestStatus::Failed);
        assert!(store.error().unwrap().starts_with("Request aborted"));

        store.submit("Rome");
        assert_eq!(store.settle().await, RequestStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_dropped_store_ignores_late_completion() {
        let backend = Arc::new(MockBackend::new());
        let gate = backend.push_gated_plan(Ok(trip("Gone")));
        let mut store = store_with(&backend);

        store.submit("Gone");
        wait_for_calls(&backend, 1).await;
        drop(store);

        gate.send(()).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(backend.plan_calls(), 1);
    }
}
