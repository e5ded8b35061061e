//! Application startup and lifecycle management.

use axum::{routing::post, Router};
use service_core::error::AppError;
use service_core::events::{AttributeSource, EventRelay};
use service_core::server::{
    method_not_allowed, shutdown_signal, standard_routes, with_standard_layers, ServiceInfo,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::EventHandlerConfig;
use crate::handlers;

pub const SERVICE: ServiceInfo = ServiceInfo::new("event-handler", env!("CARGO_PKG_VERSION"));

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<EventRelay>,
}

impl AppState {
    pub fn new(config: &EventHandlerConfig) -> Self {
        let relay = EventRelay::new(config.broker_url.clone(), AttributeSource::ce_headers())
            .with_timeout(config.common.downstream_timeout());

        Self {
            relay: Arc::new(relay),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route(
            "/",
            post(handlers::relay_event).fallback(method_not_allowed),
        )
        .merge(standard_routes(SERVICE))
        .with_state(state);

    with_standard_layers(router)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: EventHandlerConfig) -> Result<Self, AppError> {
        let state = AppState::new(&config);
        tracing::info!(broker_url = %state.relay.target(), "Forwarding events to broker");

        // Port 0 picks a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Event handler: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
