//! TUI Runner - main loop that owns the terminal and the backend-facing state
//!
//! The [`Controller`] owns the result store and chat session and mirrors them
//! into [`AppState`]. The [`TuiRunner`] wraps it with the terminal and event
//! loop: apply queued actions, drain completions, draw, wait for an event.

use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use tracing::{debug, info, trace};

use crate::backend::TripBackend;
use crate::chat::ChatSession;
use crate::config::Config;
use crate::domain::TripResult;
use crate::map::{MapInput, MapSettings, build_scene};
use crate::store::ResultStore;

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::state::{AppState, Focus, PendingAction};
use super::views;

/// Backend-facing half of the TUI
pub struct Controller {
    backend: Arc<dyn TripBackend>,
    store: ResultStore,
    /// Exists only while the shown result has a structured itinerary
    chat: Option<ChatSession>,
    map_settings: MapSettings,
    /// Result currently mirrored into the app state
    shown: Option<Arc<TripResult>>,
}

impl Controller {
    pub fn new(backend: Arc<dyn TripBackend>, map_settings: MapSettings) -> Self {
        debug!(?map_settings, "Controller::new: called");
        Self {
            store: ResultStore::new(backend.clone()),
            backend,
            chat: None,
            map_settings,
            shown: None,
        }
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn chat(&self) -> Option<&ChatSession> {
        self.chat.as_ref()
    }

    /// Carry out an action queued by the app
    pub fn dispatch(&mut self, action: PendingAction, state: &mut AppState) {
        debug!(?action, "Controller::dispatch: called");
        match action {
            PendingAction::PlanTrip(destination) => {
                let generation = self.store.submit(&destination);
                info!(%destination, generation, "Controller: planning trip");
            }
            PendingAction::SendChat(message) => {
                let Some(chat) = self.chat.as_mut() else {
                    debug!("Controller::dispatch: no chat session, dropping message");
                    return;
                };
                let context = self.shown.as_ref().and_then(|r| r.structured_itinerary.clone());
                if chat.send(&message, context) {
                    state.start_composing();
                }
            }
        }
        self.sync(state);
    }

    /// Apply arrived completions; returns true if anything changed
    pub fn poll(&mut self, state: &mut AppState) -> bool {
        let store_changed = self.store.poll();
        let chat_changed = self.chat.as_mut().is_some_and(|c| c.poll());
        if store_changed || chat_changed {
            trace!(store_changed, chat_changed, "Controller::poll: changes applied");
        }
        self.sync(state);
        store_changed || chat_changed
    }

    /// Wait for everything in flight, then sync
    pub async fn settle(&mut self, state: &mut AppState) {
        self.store.settle().await;
        self.sync(state);
        if let Some(chat) = self.chat.as_mut() {
            chat.settle().await;
        }
        self.sync(state);
    }

    /// Mirror store and chat into the app state
    pub fn sync(&mut self, state: &mut AppState) {
        state.loading = self.store.is_loading();
        state.error_message = self.store.error().map(str::to_string);
        state.active_destination = self.store.destination().map(str::to_string);

        let current = self.store.result();
        let changed = match (&self.shown, &current) {
            (Some(shown), Some(current)) => !Arc::ptr_eq(shown, current),
            (None, None) => false,
            _ => true,
        };
        if changed {
            debug!(has_result = current.is_some(), "Controller::sync: result changed");
            // A new or cleared result discards the previous conversation
            self.chat = current
                .as_ref()
                .filter(|r| r.structured_itinerary.is_some())
                .map(|_| ChatSession::new(self.backend.clone()));
            state.set_result(current.clone());
            match &current {
                Some(result) => state
                    .map
                    .update(build_scene(&MapInput::from_result(result), &self.map_settings)),
                None => state.map.clear(),
            }
            self.shown = current;
        }

        if let Some(chat) = &self.chat {
            if state.chat_turns.len() != chat.turns().len() {
                state.chat_turns = chat.turns().to_vec();
            }
            state.chat_composing = chat.is_composing();
        }
    }
}

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    event_handler: EventHandler,
    controller: Controller,
}

impl TuiRunner {
    pub fn new(terminal: Tui, backend: Arc<dyn TripBackend>, config: &Config) -> Self {
        debug!("TuiRunner::new: called");
        Self {
            app: App::new(),
            terminal,
            event_handler: EventHandler::new(Duration::from_millis(config.tui.tick_ms)),
            controller: Controller::new(backend, MapSettings::from_config(&config.map)),
        }
    }

    /// Pre-fill the destination and plan it on the first loop iteration
    pub fn with_destination(mut self, destination: Option<String>) -> Self {
        if let Some(destination) = destination.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()) {
            debug!(%destination, "TuiRunner::with_destination: queueing initial plan");
            let state = self.app.state_mut();
            state.destination_input = destination.clone();
            state.focus = Focus::Itinerary;
            state.pending_action = Some(PendingAction::PlanTrip(destination));
        }
        self
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("TuiRunner::run: entering main loop");
        loop {
            if let Some(action) = self.app.take_pending_action() {
                self.controller.dispatch(action, self.app.state_mut());
            }
            self.controller.poll(self.app.state_mut());

            self.terminal.draw(|frame| views::render(self.app.state_mut(), frame))?;

            match self.event_handler.next().await? {
                Event::Tick => {}
                Event::Key(key) => {
                    if self.app.handle_key(key) {
                        break;
                    }
                }
                Event::Resize(width, height) => {
                    debug!(width, height, "TuiRunner::run: resize");
                }
            }

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                break;
            }
        }

        info!("TuiRunner::run: exiting");
        Ok(())
    }
}
