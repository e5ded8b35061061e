//! Router plumbing shared by every sample service: health and metrics
//! routes, the standard middleware stack, JSON fallbacks and shutdown.

pub mod extract;

use std::any::Any;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub use extract::{JsonBody, parse_json};

use crate::error::{AppError, unexpected_error_response};
use crate::events::SUCCESS_MESSAGE;
use crate::middleware::{metrics_middleware, request_id_middleware, security_headers_middleware};
use crate::observability::{REQUEST_ID_HEADER, get_metrics};

/// Identity reported by the health endpoint.
#[derive(Debug, Clone, Copy)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl ServiceInfo {
    pub const fn new(name: &'static str, version: &'static str) -> Self {
        Self { name, version }
    }
}

/// Body returned once an event has been handled.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn processed() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// `/health`, `/ready` and `/metrics`.
pub fn standard_routes<S>(info: ServiceInfo) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/health",
            get(move || async move {
                (
                    StatusCode::OK,
                    Json(json!({
                        "status": "ok",
                        "service": info.name,
                        "version": info.version
                    })),
                )
            })
            .fallback(method_not_allowed),
        )
        .route("/ready", get(readiness_check).fallback(method_not_allowed))
        .route("/metrics", get(metrics_endpoint).fallback(method_not_allowed))
}

/// Readiness check endpoint for K8s readiness probes.
async fn readiness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ready" })))
}

/// Prometheus metrics endpoint.
async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

/// Fallback for unknown paths.
pub async fn not_found() -> AppError {
    AppError::not_found()
}

/// Fallback for known paths hit with the wrong method.
pub async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed()
}

/// Wrap a finished router in the standard stack: JSON 404 fallback, panic
/// catcher, security headers, request metrics, tracing span and request id.
/// Every route should carry `method_not_allowed` as its method fallback.
pub fn with_standard_layers(router: Router) -> Router {
    router
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!("Unhandled Exception: handler panicked: {}", detail);
    unexpected_error_response()
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::util::ServiceExt;

    const INFO: ServiceInfo = ServiceInfo::new("test-service", "0.0.0");

    async fn explode() -> &'static str {
        panic!("kaboom")
    }

    fn app() -> Router {
        let router = Router::new()
            .route(
                "/",
                post(|| async { "ok" }).fallback(method_not_allowed),
            )
            .route("/boom", get(explode))
            .merge(standard_routes(INFO));
        with_standard_layers(router)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_service_identity() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "test-service");
    }

    #[tokio::test]
    async fn unknown_path_is_json_404() {
        let response = app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["type"], "Not Found");
    }

    #[tokio::test]
    async fn wrong_method_is_json_405() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "Method Not Allowed");
        assert_eq!(
            body["error"]["message"],
            "The method is not allowed for the requested URL."
        );
    }

    #[tokio::test]
    async fn wrong_method_on_standard_routes_is_json_405() {
        for uri in ["/health", "/ready", "/metrics"] {
            let response = app()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", uri);
            let body = body_json(response).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["error"]["type"], "Method Not Allowed");
        }
    }

    #[tokio::test]
    async fn responses_carry_security_headers() {
        let response = app()
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
        assert!(headers.get("content-security-policy").is_some());
    }

    #[tokio::test]
    async fn panic_becomes_generic_500() {
        let response = app()
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "UnexpectedError");
        assert_eq!(body["error"]["message"], "An unexpected error has occurred.");
    }

    #[tokio::test]
    async fn request_id_is_generated_and_echoed() {
        let response = app()
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().get(REQUEST_ID_HEADER).is_some());
    }

    #[tokio::test]
    async fn request_id_from_caller_is_kept() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .header(REQUEST_ID_HEADER, "caller-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "caller-id");
    }
}
