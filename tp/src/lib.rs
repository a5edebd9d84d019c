//! Trip planner client
//!
//! Sends a destination to the trip-planning backend and presents what comes
//! back: an itinerary (structured tabs or a narrative), current weather, a map
//! of attractions and restaurants, and a trip assistant that answers questions
//! using the itinerary as context.
//!
//! # Modules
//!
//! - [`backend`] - `TripBackend` trait and its HTTP client
//! - [`domain`] - Lenient wire payloads (`TripResult`, `StructuredItinerary`, ...)
//! - [`store`] - Request lifecycle with stale-response protection
//! - [`presenter`] - Structured/legacy itinerary views
//! - [`map`] - Map scene projection and viewport state
//! - [`chat`] - Single-flight assistant conversation
//! - [`tui`] - Terminal interface
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod backend;
pub mod chat;
pub mod cli;
pub mod config;
pub mod domain;
pub mod map;
pub mod presenter;
pub mod store;
pub mod tui;

pub use backend::{BackendError, HttpBackend, TripBackend, create_backend};
pub use chat::{ChatSession, ChatState, ChatTurn};
pub use config::Config;
pub use domain::{GeoPoint, Place, StructuredItinerary, TripResult};
pub use presenter::{Presentation, present};
pub use store::{RequestLifecycle, RequestStatus, ResultStore};
