//! Client side of the trip-planning backend
//!
//! Provides the [`TripBackend`] trait and its HTTP implementation.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

mod error;
mod http;
#[cfg(test)]
pub mod mock;

pub use error::BackendError;
pub use http::HttpBackend;

use crate::config::ApiConfig;
use crate::domain::{StructuredItinerary, TripResult};

/// Body of `POST /api/plan_trip`
#[derive(Debug, Clone, Serialize)]
pub struct PlanRequest {
    pub destination: String,
}

/// Body of `POST /api/chat`
///
/// `context` is omitted entirely when there is no structured itinerary.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<StructuredItinerary>,
}

/// Response of `POST /api/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Request/response collaborator that plans trips and answers questions
///
/// Each call is one independent round-trip. Nothing is cached or retried.
#[async_trait]
pub trait TripBackend: Send + Sync {
    /// Ask the backend to plan a trip to `destination`
    async fn plan_trip(&self, destination: &str) -> Result<TripResult, BackendError>;

    /// Ask the trip assistant one question, returning its reply text
    async fn chat(&self, request: ChatRequest) -> Result<String, BackendError>;
}

/// Run a backend call on its own task and turn a panic into an error
///
/// Callers report the outcome over a channel; without this a panicking call
/// would never report at all.
pub(crate) async fn supervised<T, F>(call: F) -> Result<T, BackendError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, BackendError>> + Send + 'static,
{
    match tokio::spawn(call).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "supervised: backend call aborted");
            Err(BackendError::Aborted(e.to_string()))
        }
    }
}

/// Create the HTTP backend described by the config
pub fn create_backend(config: &ApiConfig) -> Result<Arc<dyn TripBackend>, BackendError> {
    debug!(base_url = %config.resolved_base_url(), "create_backend: called");
    Ok(Arc::new(HttpBackend::from_config(config)?))
}
