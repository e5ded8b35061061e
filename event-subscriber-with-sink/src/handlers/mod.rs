pub mod events;

pub use events::forward_to_sink;
