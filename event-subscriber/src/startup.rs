//! Application startup and lifecycle management.

use axum::{routing::post, Router};
use service_core::error::AppError;
use service_core::server::{
    method_not_allowed, shutdown_signal, standard_routes, with_standard_layers, ServiceInfo,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::config::SubscriberConfig;
use crate::handlers;

pub const SERVICE: ServiceInfo = ServiceInfo::new("event-subscriber", env!("CARGO_PKG_VERSION"));

pub fn build_router() -> Router {
    let router = Router::new()
        .route(
            "/",
            post(handlers::receive_event).fallback(method_not_allowed),
        )
        .merge(standard_routes(SERVICE));

    with_standard_layers(router)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: SubscriberConfig) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Event subscriber: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(),
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
