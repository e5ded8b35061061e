use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::events::{DeliveryError, ValidationError};

/// Message returned to callers for any failure we did not classify.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error has occurred.";

#[derive(Debug, Error)]
pub enum AppError {
    /// Faults raised by the HTTP layer itself: malformed bodies, unknown
    /// routes, disallowed methods.
    #[error("HTTP error {status}: {description}")]
    Http {
        status: StatusCode,
        description: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(description: impl Into<String>) -> Self {
        AppError::Http {
            status: StatusCode::BAD_REQUEST,
            description: description.into(),
        }
    }

    pub fn not_found() -> Self {
        AppError::Http {
            status: StatusCode::NOT_FOUND,
            description: "The requested URL was not found on the server. If you entered the URL \
                          manually please check your spelling and try again."
                .to_string(),
        }
    }

    pub fn method_not_allowed() -> Self {
        AppError::Http {
            status: StatusCode::METHOD_NOT_ALLOWED,
            description: "The method is not allowed for the requested URL.".to_string(),
        }
    }

    /// The `type` reported to callers in the error body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Http { status, .. } => status.canonical_reason().unwrap_or("HTTP Error"),
            AppError::Validation(_) => "ValidationError",
            AppError::Delivery(_) => "DeliveryError",
            AppError::ConfigError(_) | AppError::InternalError(_) => "UnexpectedError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Http { status, .. } => *status,
            AppError::Validation(_) | AppError::Delivery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ConfigError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// JSON body shared by every failure response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                kind: kind.into(),
                message: message.into(),
            },
        }
    }
}

/// Response for faults nobody classified, including panics caught by the
/// router. Detail stays in the logs.
pub fn unexpected_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("UnexpectedError", UNEXPECTED_ERROR_MESSAGE)),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        let message = match &self {
            AppError::Http { description, .. } => {
                tracing::error!(status = status.as_u16(), "HTTP Exception: {}", description);
                description.clone()
            }
            AppError::Validation(err) => {
                tracing::error!(error_type = kind, "{}", err);
                err.to_string()
            }
            AppError::Delivery(err) => {
                tracing::error!(error_type = kind, "{}", err);
                err.to_string()
            }
            AppError::ConfigError(err) | AppError::InternalError(err) => {
                tracing::error!("Unhandled Exception: {:#}", err);
                return unexpected_error_response();
            }
        };

        (status, Json(ErrorResponse::new(kind, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_maps_to_422() {
        let err = AppError::from(ValidationError::MissingHeaders(vec![
            "ce_type".to_string(),
            "ce_source".to_string(),
        ]));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "error": {
                    "type": "ValidationError",
                    "message": "Message cannot be processed. Missing required event headers: ce_type, ce_source"
                }
            })
        );
    }

    #[tokio::test]
    async fn delivery_error_maps_to_422() {
        let err = AppError::from(DeliveryError::Rejected {
            status: 500,
            body: "boom".to_string(),
        });
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "error": { "type": "DeliveryError", "message": "500 boom" }
            })
        );
    }

    #[tokio::test]
    async fn http_fault_keeps_its_status() {
        let response = AppError::method_not_allowed().into_response();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["type"], "Method Not Allowed");
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let err = AppError::InternalError(anyhow::anyhow!("connection string leaked"));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "UnexpectedError");
        assert_eq!(body["error"]["message"], UNEXPECTED_ERROR_MESSAGE);
    }
}
