//! Core library for the agenda client.
//!
//! - `slot`: calendar slot normalization (selection to days, day + time to timestamp)
//! - `model`: events, tasks and the combined calendar feed
//! - `client`: REST client for the agenda backend
//! - `session`, `dialog`: injected services for auth state and confirmations
//! - `agenda`, `tasks`, `calendar`: view state driven by a front end

pub mod agenda;
pub mod calendar;
pub mod client;
pub mod config;
pub mod dialog;
pub mod error;
pub mod model;
pub mod session;
pub mod slot;
pub mod tasks;

#[cfg(test)]
mod testing;

pub use error::{AgendaError, AgendaResult, ErrorCategory, ValidationError};
pub use model::*;
pub use slot::{CalendarDay, EventSpan, SlotSelection, TimeOfDay};
