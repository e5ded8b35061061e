//! CloudEvents structured-mode HTTP binding (JSON event format, v1.0).
//!
//! The whole event, attributes and `data`, travels as one JSON document in
//! the request body; the only transport header is the content type.

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, header::CONTENT_TYPE};

use super::envelope::{EventEnvelope, SPEC_VERSION};
use super::error::EncodingError;

pub const STRUCTURED_CONTENT_TYPE: &str = "application/cloudevents+json";

/// Serialize an envelope into transport headers and a body.
pub fn encode(envelope: &EventEnvelope) -> Result<(HeaderMap, Bytes), EncodingError> {
    let body = serde_json::to_vec(envelope)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(STRUCTURED_CONTENT_TYPE),
    );

    Ok((headers, Bytes::from(body)))
}

/// Parse a structured-mode message back into an envelope.
pub fn decode(headers: &HeaderMap, body: &[u8]) -> Result<EventEnvelope, EncodingError> {
    if !is_structured(headers) {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("<none>")
            .to_string();
        return Err(EncodingError::UnsupportedContentType(content_type));
    }

    let envelope: EventEnvelope = serde_json::from_slice(body)?;
    if envelope.spec_version() != SPEC_VERSION {
        return Err(EncodingError::UnsupportedSpecVersion(
            envelope.spec_version().to_string(),
        ));
    }
    envelope.validate()?;

    Ok(envelope)
}

/// True when the content type announces a structured CloudEvent. Media type
/// parameters such as `charset` are ignored.
pub fn is_structured(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|media_type| {
            media_type
                .trim()
                .eq_ignore_ascii_case(STRUCTURED_CONTENT_TYPE)
        })
        .unwrap_or(false)
}
