use axum::{extract::State, http::HeaderMap, http::StatusCode};
use service_core::error::AppError;
use service_core::server::JsonBody;

use crate::startup::AppState;

/// Forward the received event to the Kafka sink. Answers with an empty body.
#[tracing::instrument(skip_all)]
pub async fn forward_to_sink(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(event): JsonBody,
) -> Result<StatusCode, AppError> {
    tracing::info!("event message: {}", event);

    let receipt = state.relay.relay(&headers, event).await?;
    tracing::info!("response code: {}", receipt.status.as_u16());

    Ok(StatusCode::OK)
}
