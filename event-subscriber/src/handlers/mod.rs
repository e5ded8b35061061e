pub mod events;

pub use events::receive_event;
