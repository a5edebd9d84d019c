//! TUI application - event handling and state management
//!
//! The App struct owns the AppState and handles all keyboard events.
//! It does not do any rendering - that's delegated to the views module.
//! Work that needs the backend is queued as a [`PendingAction`] for the runner.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, trace};

use super::state::{AppState, Focus, InteractionMode, PendingAction};

/// Lines moved per PageUp/PageDown
const PAGE_SCROLL: i32 = 10;

/// TUI application
#[derive(Debug)]
pub struct App {
    state: AppState,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        debug!("App::new: called");
        Self { state: AppState::new() }
    }

    pub fn state(&self) -> &AppState {
        trace!("App::state: called");
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        trace!("App::state_mut: called");
        &mut self.state
    }

    /// Take the queued action, if any
    pub fn take_pending_action(&mut self) -> Option<PendingAction> {
        self.state.pending_action.take()
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, focus = ?self.state.focus, "App::handle_key: called");
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            debug!("App::handle_key: Ctrl+C force quit");
            return true;
        }

        match self.state.interaction_mode {
            InteractionMode::Help => self.handle_help_key(key),
            InteractionMode::Normal => self.handle_normal_key(key),
        }
        self.state.should_quit
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        debug!(?key, "App::handle_help_key: called");
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc) {
            self.state.interaction_mode = InteractionMode::Normal;
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        // Global keys, available from every pane
        match (key.code, key.modifiers) {
            (KeyCode::Char('a'), m) if m.contains(KeyModifiers::CONTROL) => {
                let open = self.state.toggle_chat();
                debug!(open, "App::handle_normal_key: chat toggled");
                return;
            }
            (KeyCode::Tab, _) => {
                self.state.focus = self.state.focus.next(self.state.chat_open);
                return;
            }
            (KeyCode::BackTab, _) => {
                self.state.focus = self.state.focus.prev(self.state.chat_open);
                return;
            }
            _ => {}
        }

        match self.state.focus {
            Focus::Destination => self.handle_destination_key(key),
            Focus::Chat => self.handle_chat_key(key),
            Focus::Itinerary => self.handle_itinerary_key(key),
            Focus::Map => self.handle_map_key(key),
        }
    }

    /// Keys shared by the non-text panes; returns true if handled
    fn handle_navigation_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => {
                debug!("App::handle_navigation_key: quit requested");
                self.state.should_quit = true;
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.state.interaction_mode = InteractionMode::Help;
            }
            KeyCode::Char('n') => self.state.map.select_next(),
            KeyCode::Char('p') => self.state.map.select_prev(),
            KeyCode::Char('/') | KeyCode::Char('i') => self.state.focus = Focus::Destination,
            _ => return false,
        }
        true
    }

    fn handle_destination_key(&mut self, key: KeyEvent) {
        debug!(?key, loading = self.state.loading, "App::handle_destination_key: called");
        match key.code {
            KeyCode::Enter => self.submit_destination(),
            KeyCode::Esc => self.state.focus = Focus::Itinerary,
            // Input is disabled while a request is in flight
            _ if self.state.loading => {}
            KeyCode::Backspace => {
                self.state.destination_input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.destination_input.push(c);
            }
            _ => {}
        }
    }

    fn submit_destination(&mut self) {
        if !self.state.can_submit() {
            debug!("App::submit_destination: inert (loading or blank)");
            return;
        }
        let destination = self.state.destination_input.trim().to_string();
        debug!(%destination, "App::submit_destination: queueing plan");
        self.state.clear_error();
        self.state.pending_action = Some(PendingAction::PlanTrip(destination));
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        debug!(?key, composing = self.state.chat_composing, "App::handle_chat_key: called");
        match key.code {
            KeyCode::Enter => self.submit_chat(),
            KeyCode::Esc => self.state.focus = Focus::Itinerary,
            KeyCode::Up => self.state.scroll_chat(1),
            KeyCode::Down => self.state.scroll_chat(-1),
            KeyCode::PageUp => self.state.scroll_chat(PAGE_SCROLL),
            KeyCode::PageDown => self.state.scroll_chat(-PAGE_SCROLL),
            // Input is disabled while the assistant is composing
            _ if self.state.chat_composing => {}
            KeyCode::Backspace => {
                self.state.chat_input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.chat_input.push(c);
            }
            _ => {}
        }
    }

    fn submit_chat(&mut self) {
        if self.state.chat_composing || self.state.chat_input.trim().is_empty() {
            debug!("App::submit_chat: inert (composing or blank)");
            return;
        }
        let message = std::mem::take(&mut self.state.chat_input);
        debug!(message_len = message.len(), "App::submit_chat: queueing message");
        self.state.chat_scroll = 0;
        self.state.pending_action = Some(PendingAction::SendChat(message));
    }

    fn handle_itinerary_key(&mut self, key: KeyEvent) {
        if self.handle_navigation_key(key) {
            return;
        }
        match key.code {
            KeyCode::Right | KeyCode::Char('l') => self.state.active_tab = self.state.active_tab.next(),
            KeyCode::Left | KeyCode::Char('h') => self.state.active_tab = self.state.active_tab.prev(),
            KeyCode::Down | KeyCode::Char('j') => self.state.scroll_itinerary(1),
            KeyCode::Up | KeyCode::Char('k') => self.state.scroll_itinerary(-1),
            KeyCode::PageDown => self.state.scroll_itinerary(PAGE_SCROLL),
            KeyCode::PageUp => self.state.scroll_itinerary(-PAGE_SCROLL),
            KeyCode::Home | KeyCode::Char('g') => {
                let current = i32::from(self.state.itinerary_scroll());
                self.state.scroll_itinerary(-current);
            }
            _ => {}
        }
    }

    fn handle_map_key(&mut self, key: KeyEvent) {
        if self.handle_navigation_key(key) {
            return;
        }
        match key.code {
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Right | KeyCode::Char('l') => self.state.map.select_next(),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Left | KeyCode::Char('h') => self.state.map.select_prev(),
            KeyCode::Esc => self.state.map.clear_selection(),
            _ => {}
        }
    }
}
