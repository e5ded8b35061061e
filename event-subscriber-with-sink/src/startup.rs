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

use crate::config::{SinkConfig, SINK_EVENT_SOURCE, SINK_EVENT_TYPE};
use crate::handlers;

pub const SERVICE: ServiceInfo =
    ServiceInfo::new("event-subscriber-with-sink", env!("CARGO_PKG_VERSION"));

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<EventRelay>,
}

impl AppState {
    pub fn new(config: &SinkConfig) -> Self {
        let attributes = AttributeSource::fixed(SINK_EVENT_TYPE, SINK_EVENT_SOURCE);
        let relay = EventRelay::new(config.kafka_sink_url.clone(), attributes)
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
            post(handlers::forward_to_sink).fallback(method_not_allowed),
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
    pub async fn build(config: SinkConfig) -> Result<Self, AppError> {
        let state = AppState::new(&config);
        tracing::info!(
            sink_url = %state.relay.target(),
            event_type = SINK_EVENT_TYPE,
            event_source = SINK_EVENT_SOURCE,
            "Forwarding events to Kafka sink"
        );

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Event subscriber with sink: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
