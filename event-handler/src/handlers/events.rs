use axum::{extract::State, http::HeaderMap, Json};
use service_core::error::AppError;
use service_core::server::{JsonBody, SuccessResponse};

use crate::startup::AppState;

/// Wrap the posted event in a CloudEvent built from its `ce_type` and
/// `ce_source` headers and hand it to the broker.
#[tracing::instrument(skip_all)]
pub async fn relay_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(event): JsonBody,
) -> Result<Json<SuccessResponse>, AppError> {
    state.relay.relay(&headers, event).await?;

    Ok(Json(SuccessResponse::processed()))
}
