//! Trip assistant conversation
//!
//! One question at a time: while a reply is pending, further sends are ignored.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::backend::{BackendError, ChatRequest, TripBackend, supervised};
use crate::domain::StructuredItinerary;

/// First turn of every session
pub const GREETING: &str = "Hi! I can help you with details about your trip. Ask me anything!";

/// Assistant turn appended when a chat request fails for any reason
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    #[default]
    Idle,
    Sending,
}

pub struct ChatSession {
    backend: Arc<dyn TripBackend>,
    turns: Vec<ChatTurn>,
    in_flight: bool,
    tx: mpsc::UnboundedSender<Result<String, BackendError>>,
    rx: mpsc::UnboundedReceiver<Result<String, BackendError>>,
}

impl ChatSession {
    /// New session seeded with the greeting
    pub fn new(backend: Arc<dyn TripBackend>) -> Self {
        debug!("ChatSession::new: called");
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            turns: vec![ChatTurn::assistant(GREETING)],
            in_flight: false,
            tx,
            rx,
        }
    }

    /// Send a question; returns false when nothing was sent
    ///
    /// Blank text and sends while a reply is pending are ignored. The text is
    /// recorded as typed; `context` goes to the backend unchanged.
    pub fn send(&mut self, text: &str, context: Option<StructuredItinerary>) -> bool {
        debug!(text_len = text.len(), in_flight = self.in_flight, "ChatSession::send: called");
        if text.trim().is_empty() {
            debug!("ChatSession::send: blank message, ignoring");
            return false;
        }
        if self.in_flight {
            debug!("ChatSession::send: reply pending, ignoring");
            return false;
        }

        self.turns.push(ChatTurn::user(text));
        self.in_flight = true;

        let request = ChatRequest {
            message: text.to_string(),
            context,
        };
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = supervised(async move { backend.chat(request).await }).await;
            let _ = tx.send(outcome);
        });
        true
    }

    /// Apply a pending reply if it has arrived; returns true if a turn was added
    pub fn poll(&mut self) -> bool {
        match self.rx.try_recv() {
            Ok(outcome) => {
                self.complete(outcome);
                true
            }
            Err(_) => false,
        }
    }

    /// Wait for the pending reply, if any
    pub async fn settle(&mut self) {
        if !self.in_flight {
            return;
        }
        if let Some(outcome) = self.rx.recv().await {
            self.complete(outcome);
        }
    }

    fn complete(&mut self, outcome: Result<String, BackendError>) {
        let text = match outcome {
            Ok(reply) => {
                info!(reply_len = reply.len(), "ChatSession: reply received");
                reply
            }
            Err(e) => {
                warn!(error = %e, "ChatSession: chat request failed");
                FALLBACK_REPLY.to_string()
            }
        };
        self.turns.push(ChatTurn::assistant(text));
        self.in_flight = false;
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Latest assistant reply
    pub fn last_reply(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == ChatRole::Assistant)
            .map(|t| t.text.as_str())
    }

    pub fn state(&self) -> ChatState {
        if self.in_flight { ChatState::Sending } else { ChatState::Idle }
    }

    pub fn is_composing(&self) -> bool {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use serde_json::json;

    fn session(backend: &Arc<MockBackend>) -> ChatSession {
        ChatSession::new(backend.clone())
    }

    #[tokio::test]
    async fn test_seeded_with_greeting() {
        let backend = Arc::new(MockBackend::new());
        let chat = session(&backend);
        assert_eq!(chat.turns(), &[ChatTurn::assistant(GREETING)]);
        assert_eq!(chat.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn test_blank_messages_are_ignored() {
        let backend = Arc::new(MockBackend::new());
        let mut chat = session(&backend);

        assert!(!chat.send("", None));
        assert!(!chat.send("   ", None));
        assert_eq!(chat.turns().len(), 1);
        assert_eq!(chat.state(), ChatState::Idle);
        assert_eq!(backend.chat_calls(), 0);
    }

    #[tokio::test]
    async fn test_send_and_reply() {
        let backend = Arc::new(MockBackend::new());
        backend.push_chat(Ok("Start at the Colosseum.".to_string()));
        let mut chat = session(&backend);

        assert!(chat.send("Where should I start?", None));
        assert!(chat.is_composing());
        assert_eq!(chat.turns().last().unwrap(), &ChatTurn::user("Where should I start?"));

        chat.settle().await;
        assert_eq!(chat.state(), ChatState::Idle);
        assert_eq!(chat.last_reply(), Some("Start at the Colosseum."));
        assert_eq!(chat.turns().len(), 3);
    }

    #[tokio::test]
    async fn test_second_send_while_pending_is_ignored() {
        let backend = Arc::new(MockBackend::new());
        let gate = backend.push_gated_chat(Ok("first".to_string()));
        let mut chat = session(&backend);

        assert!(chat.send("one", None));
        assert!(!chat.send("two", None));
        assert_eq!(chat.turns().len(), 2);

        gate.send(()).unwrap();
        chat.settle().await;
        assert_eq!(backend.chat_calls(), 1);
        assert_eq!(chat.turns().len(), 3);
    }

    #[tokio::test]
    async fn test_failure_appends_one_fallback_and_recovers() {
        let backend = Arc::new(MockBackend::new());
        backend.push_chat(Err(BackendError::Malformed("missing field `response`".to_string())));
        backend.push_chat(Ok("Recovered".to_string()));
        let mut chat = session(&backend);

        chat.send("hello", None);
        chat.settle().await;
        let fallbacks = chat.turns().iter().filter(|t| t.text == FALLBACK_REPLY).count();
        assert_eq!(fallbacks, 1);
        assert_eq!(chat.state(), ChatState::Idle);

        assert!(chat.send("again", None));
        chat.settle().await;
        assert_eq!(chat.last_reply(), Some("Recovered"));
    }

    #[tokio::test]
    async fn test_panicking_backend_falls_back_and_unlocks() {
        let backend = Arc::new(MockBackend::new());
        backend.push_panicking_chat();
        backend.push_chat(Ok("Still here".to_string()));
        let mut chat = session(&backend);

        assert!(chat.send("hello", None));
        tokio::time::timeout(std::time::Duration::from_secs(2), chat.settle())
            .await
            .expect("settle after panic");
        assert_eq!(chat.last_reply(), Some(FALLBACK_REPLY));
        assert!(!chat.is_composing());

        assert!(chat.send("again", None));
        chat.settle().await;
        assert_eq!(chat.last_reply(), Some("Still here"));
    }

    #[tokio::test]
    async fn test_context_passed_through() {
        let backend = Arc::new(MockBackend::new());
        backend.push_chat(Ok("ok".to_string()));
        let mut chat = session(&backend);
        let raw = json!({ "trip_title": "Kyoto", "notes": "temples" });

        chat.send("What is the plan?", Some(StructuredItinerary::from_value(raw.clone())));
        chat.settle().await;

        let requests = backend.chat_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].message, "What is the plan?");
        assert_eq!(requests[0].context.as_ref().unwrap().context(), &raw);
    }

    #[tokio::test]
    async fn test_poll_without_reply_is_noop() {
        let backend = Arc::new(MockBackend::new());
        let mut chat = session(&backend);
        assert!(!chat.poll());
        chat.settle().await;
        assert_eq!(chat.turns().len(), 1);
    }
}
