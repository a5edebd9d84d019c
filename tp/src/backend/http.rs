//! HTTP implementation of the trip-planning backend
//!
//! Two JSON endpoints, both `POST`: `/api/plan_trip` and `/api/chat`. Each call
//! is a single round-trip with a client-side timeout; nothing is retried.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::{BackendError, ChatReply, ChatRequest, PlanRequest, TripBackend};
use crate::config::ApiConfig;
use crate::domain::TripResult;

const PLAN_TRIP_PATH: &str = "/api/plan_trip";
const CHAT_PATH: &str = "/api/chat";

/// reqwest-based backend client
pub struct HttpBackend {
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl HttpBackend {
    /// Create a client from the API section of the config
    pub fn from_config(config: &ApiConfig) -> Result<Self, BackendError> {
        debug!(?config, "HttpBackend::from_config: called");
        Self::new(config.resolved_base_url(), config.timeout())
    }

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(BackendError::Config("base URL is empty".to_string()));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            http,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a transport error, folding timeouts into their own variant
    fn classify(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::Network(err)
        }
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(%url, "post_json: sending request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), %body, "post_json: non-success status");
            return Err(BackendError::from_status(status));
        }

        let text = response.text().await.map_err(|e| self.classify(e))?;
        debug!(%url, body_len = text.len(), "post_json: received response");

        serde_json::from_str(&text).map_err(|e| {
            warn!(%url, error = %e, "post_json: failed to decode response");
            BackendError::Malformed(e.to_string())
        })
    }
}

#[async_trait]
impl TripBackend for HttpBackend {
    async fn plan_trip(&self, destination: &str) -> Result<TripResult, BackendError> {
        debug!(%destination, "HttpBackend::plan_trip: called");
        let request = PlanRequest {
            destination: destination.to_string(),
        };
        self.post_json(PLAN_TRIP_PATH, &request).await
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, BackendError> {
        debug!(message_len = request.message.len(), has_context = request.context.is_some(), "HttpBackend::chat: called");
        let reply: ChatReply = self.post_json(CHAT_PATH, &request).await?;
        Ok(reply.response)
    }
}
