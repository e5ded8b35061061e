use std::time::Duration;
use thiserror::Error;

/// The inbound request cannot be turned into an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Message cannot be processed. Missing required event headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    #[error("Event attribute '{0}' must be a non-empty string")]
    EmptyAttribute(&'static str),
}

/// The envelope could not be handed over to the downstream.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Downstream answered with anything other than 202 Accepted.
    #[error("{status} {body}")]
    Rejected { status: u16, body: String },

    #[error("Downstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Failed to reach downstream: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("Malformed event JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Unsupported specversion: {0}")]
    UnsupportedSpecVersion(String),

    #[error("Invalid event: {0}")]
    Invalid(#[from] ValidationError),
}
