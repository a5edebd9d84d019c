//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here, and no backend
//! access: the runner mirrors the result store and chat session into this
//! state on every tick.

use std::sync::Arc;

use rand::seq::IndexedRandom;
use tracing::debug;

use crate::chat::{ChatTurn, GREETING};
use crate::domain::TripResult;
use crate::map::MapView;
use crate::presenter::{ItineraryTab, Presentation, present};

/// Words for the composing indicator while the assistant replies
pub const COMPOSING_WORDS: &[&str] = &[
    "Thinking",
    "Checking the map",
    "Consulting guidebooks",
    "Packing",
    "Scouting",
    "Wandering",
    "Planning",
    "Sightseeing",
];

/// Shown in the destination input while it is empty
pub const DESTINATION_PLACEHOLDER: &str = "Where do you want to go? (e.g., Paris, Tokyo)";

/// Shown in the chat input while it is empty
pub const CHAT_PLACEHOLDER: &str = "Ask about your trip...";

/// Which pane receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Destination,
    Itinerary,
    Map,
    Chat,
}

impl Focus {
    /// Next pane in the cycle; Chat only takes part while its panel is open
    pub fn next(self, chat_open: bool) -> Self {
        debug!(focus = ?self, chat_open, "Focus::next: called");
        match self {
            Self::Destination => Self::Itinerary,
            Self::Itinerary => Self::Map,
            Self::Map if chat_open => Self::Chat,
            Self::Map | Self::Chat => Self::Destination,
        }
    }

    /// Previous pane in the cycle
    pub fn prev(self, chat_open: bool) -> Self {
        debug!(focus = ?self, chat_open, "Focus::prev: called");
        match self {
            Self::Destination if chat_open => Self::Chat,
            Self::Destination => Self::Map,
            Self::Itinerary => Self::Destination,
            Self::Map => Self::Itinerary,
            Self::Chat => Self::Map,
        }
    }

    /// True when this pane takes typed text
    pub fn is_text_input(self) -> bool {
        matches!(self, Self::Destination | Self::Chat)
    }
}

/// Interaction mode (modal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Normal navigation and typing
    #[default]
    Normal,
    /// Help overlay
    Help,
}

/// Action pending execution by the runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Plan a trip to the (trimmed) destination
    PlanTrip(String),
    /// Ask the assistant a question
    SendChat(String),
}

/// Application state
#[derive(Debug, Default)]
pub struct AppState {
    pub should_quit: bool,
    pub interaction_mode: InteractionMode,
    pub focus: Focus,

    // === Destination form ===
    pub destination_input: String,
    /// A trip request is in flight; the input is disabled
    pub loading: bool,
    /// Destination of the request in flight or last completed
    pub active_destination: Option<String>,
    /// Inline error under the input
    pub error_message: Option<String>,

    // === Result ===
    pub result: Option<Arc<TripResult>>,
    pub presentation: Option<Presentation>,
    pub active_tab: ItineraryTab,
    /// Scroll offset per structured tab
    pub tab_scroll: [u16; 3],
    /// Scroll offset of the legacy panel
    pub legacy_scroll: u16,

    // === Map ===
    pub map: MapView,

    // === Chat ===
    /// A chat session exists for the current result
    pub chat_available: bool,
    pub chat_open: bool,
    pub chat_input: String,
    pub chat_turns: Vec<ChatTurn>,
    pub chat_composing: bool,
    pub composing_word: String,
    /// Lines scrolled up from the bottom of the conversation
    pub chat_scroll: u16,

    pub pending_action: Option<PendingAction>,
}

impl AppState {
    pub fn new() -> Self {
        debug!("AppState::new: called");
        Self {
            chat_turns: vec![ChatTurn::assistant(GREETING)],
            ..Self::default()
        }
    }

    /// Replace the shown result, resetting per-result view state
    ///
    /// `None` unmounts everything that depends on a result, chat included.
    pub fn set_result(&mut self, result: Option<Arc<TripResult>>) {
        debug!(has_result = result.is_some(), "AppState::set_result: called");
        self.presentation = result.as_deref().map(present);
        self.active_tab = ItineraryTab::default();
        self.tab_scroll = [0; 3];
        self.legacy_scroll = 0;

        self.chat_available = result.as_ref().is_some_and(|r| r.structured_itinerary.is_some());
        if !self.chat_available {
            self.chat_open = false;
            if self.focus == Focus::Chat {
                self.focus = Focus::Itinerary;
            }
        }
        self.chat_input.clear();
        self.chat_turns = vec![ChatTurn::assistant(GREETING)];
        self.chat_composing = false;
        self.chat_scroll = 0;

        self.result = result;
    }

    /// Open or close the chat panel; returns the new open state
    pub fn toggle_chat(&mut self) -> bool {
        debug!(chat_available = self.chat_available, chat_open = self.chat_open, "AppState::toggle_chat: called");
        if !self.chat_available {
            return false;
        }
        self.chat_open = !self.chat_open;
        if self.chat_open {
            self.focus = Focus::Chat;
        } else if self.focus == Focus::Chat {
            self.focus = Focus::Itinerary;
        }
        self.chat_open
    }

    /// Start the composing indicator with a fresh random word
    pub fn start_composing(&mut self) {
        debug!("AppState::start_composing: called");
        let mut rng = rand::rng();
        self.composing_word = COMPOSING_WORDS.choose(&mut rng).unwrap_or(&"Thinking").to_string();
        self.chat_composing = true;
    }

    /// Whether the Go action is enabled
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.destination_input.trim().is_empty()
    }

    /// Scroll offset of whatever the itinerary pane shows
    pub fn itinerary_scroll(&self) -> u16 {
        match &self.presentation {
            Some(Presentation::Structured(_)) => self.tab_scroll[self.active_tab.index()],
            _ => self.legacy_scroll,
        }
    }

    pub fn scroll_itinerary(&mut self, delta: i32) {
        let current = self.itinerary_scroll();
        let next = (i32::from(current) + delta).clamp(0, i32::from(u16::MAX)) as u16;
        match &self.presentation {
            Some(Presentation::Structured(_)) => self.tab_scroll[self.active_tab.index()] = next,
            _ => self.legacy_scroll = next,
        }
    }

    pub fn scroll_chat(&mut self, delta: i32) {
        self.chat_scroll = (i32::from(self.chat_scroll) + delta).clamp(0, i32::from(u16::MAX)) as u16;
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}
