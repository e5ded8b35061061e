use axum::{body::Bytes, http::HeaderMap, Json};
use service_core::error::AppError;
use service_core::events::{decode, is_structured};
use service_core::observability::extract_traceparent;
use service_core::server::{parse_json, SuccessResponse};

/// Log the event delivered by the broker and acknowledge it.
#[tracing::instrument(skip_all)]
pub async fn receive_event(
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SuccessResponse>, AppError> {
    let event = parse_json(&body)?;
    let traceparent = extract_traceparent(&headers);

    match event_attributes(&headers, &body) {
        Some((event_type, source)) => tracing::info!(
            event_type = %event_type,
            event_source = %source,
            traceparent = ?traceparent,
            "Received event message: {}",
            event
        ),
        None => tracing::info!(traceparent = ?traceparent, "Received event message: {}", event),
    }

    Ok(Json(SuccessResponse::processed()))
}

/// `(type, source)` of a CloudEvent in structured or binary mode, if the
/// request carries one.
pub fn event_attributes(headers: &HeaderMap, body: &[u8]) -> Option<(String, String)> {
    if is_structured(headers) {
        return decode(headers, body)
            .ok()
            .map(|envelope| (envelope.event_type().to_string(), envelope.source().to_string()));
    }

    let attribute = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };
    Some((attribute("ce-type")?, attribute("ce-source")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_binary_mode_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("ce-type", HeaderValue::from_static("dev.example.created"));
        headers.insert("ce-source", HeaderValue::from_static("svc-a"));

        assert_eq!(
            event_attributes(&headers, b"{}"),
            Some(("dev.example.created".to_string(), "svc-a".to_string()))
        );
    }

    #[test]
    fn reads_structured_mode_body() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/cloudevents+json"),
        );
        let body = br#"{"specversion":"1.0","id":"1","source":"svc-b","type":"dev.example.deleted","data":{}}"#;

        assert_eq!(
            event_attributes(&headers, body),
            Some(("dev.example.deleted".to_string(), "svc-b".to_string()))
        );
    }

    #[test]
    fn plain_json_has_no_attributes() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        assert_eq!(event_attributes(&headers, br#"{"id":1}"#), None);
    }
}
