//! service-core: Shared infrastructure for the knative event sample services.
pub mod config;
pub mod error;
pub mod events;
pub mod middleware;
pub mod observability;
pub mod server;

pub use axum;
pub use reqwest;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower;
pub use tower_http;
pub use tracing;
