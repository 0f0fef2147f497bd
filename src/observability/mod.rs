//! Observability for the node-type registry
//!
//! - Structured logging (JSON lines)
//! - Typed registry events
//!
//! Observability is read-only: nothing here changes registry or node state.
//!
//! # Usage
//!
//! ```ignore
//! use nodetypes::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RegistrySealed, &[("types", "87")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a registry event
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a registry event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
