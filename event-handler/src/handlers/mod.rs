//! HTTP handlers for event-handler.

pub mod events;

pub use events::relay_event;
