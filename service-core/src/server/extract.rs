use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::Value;

use crate::error::AppError;

/// JSON request body parsed whatever `Content-Type` the caller sent.
///
/// Brokers deliver events with assorted content types (`application/json`,
/// `application/cloudevents+json`, or none at all), so the header is not
/// checked. Unparseable bodies become a 400 HTTP fault.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Http {
                status: rejection.status(),
                description: rejection.body_text(),
            })?;

        parse_json(&bytes).map(JsonBody)
    }
}

/// Parse a request body as JSON, reporting failures as a 400 HTTP fault.
pub fn parse_json(bytes: &[u8]) -> Result<Value, AppError> {
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::bad_request(format!("Failed to decode JSON object: {}", e)))
}
