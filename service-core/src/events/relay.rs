//! Event relay: validate inbound metadata, wrap the payload in a CloudEvent
//! and forward it to the configured downstream.

use std::time::Duration;

use http::{HeaderMap, HeaderName, StatusCode};
use serde_json::Value;

use super::encoding::encode;
use super::envelope::EventEnvelope;
use super::error::{DeliveryError, ValidationError};
use crate::error::AppError;
use crate::observability::{extract_request_id, inject_trace_headers, record_delivery};

/// Message returned to callers once the downstream accepted the event.
pub const SUCCESS_MESSAGE: &str = "Message successfully processed!";

/// Outbound calls give up after this long unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the envelope's `type` and `source` come from.
#[derive(Debug, Clone)]
pub enum AttributeSource {
    /// Read both attributes from request headers; both headers are required.
    Headers {
        type_header: HeaderName,
        source_header: HeaderName,
    },
    /// Use the same attributes for every event.
    Fixed { event_type: String, source: String },
}

impl AttributeSource {
    /// The `ce_type` / `ce_source` headers used by the broker samples.
    pub fn ce_headers() -> Self {
        AttributeSource::Headers {
            type_header: HeaderName::from_static("ce_type"),
            source_header: HeaderName::from_static("ce_source"),
        }
    }

    pub fn fixed(event_type: impl Into<String>, source: impl Into<String>) -> Self {
        AttributeSource::Fixed {
            event_type: event_type.into(),
            source: source.into(),
        }
    }

    /// Resolve `(type, source)` for one request.
    ///
    /// Every required header that is absent, blank or not visible ASCII is
    /// reported, in declaration order.
    pub fn resolve(&self, headers: &HeaderMap) -> Result<(String, String), ValidationError> {
        match self {
            AttributeSource::Fixed { event_type, source } => {
                Ok((event_type.clone(), source.clone()))
            }
            AttributeSource::Headers {
                type_header,
                source_header,
            } => {
                let event_type = header_value(headers, type_header);
                let source = header_value(headers, source_header);

                match (event_type, source) {
                    (Some(event_type), Some(source)) => Ok((event_type, source)),
                    (event_type, source) => {
                        let mut missing = Vec::new();
                        if event_type.is_none() {
                            missing.push(type_header.as_str().to_string());
                        }
                        if source.is_none() {
                            missing.push(source_header.as_str().to_string());
                        }
                        Err(ValidationError::MissingHeaders(missing))
                    }
                }
            }
        }
    }
}

fn header_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.to_string())
}

/// Outcome of a single forwarding attempt.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub status: StatusCode,
    pub body: String,
}

/// Forwards envelopes to one downstream URL.
///
/// Built once at start-up and shared across requests; holds no per-request
/// state.
#[derive(Debug, Clone)]
pub struct EventRelay {
    client: reqwest::Client,
    target: String,
    attributes: AttributeSource,
    timeout: Duration,
}

impl EventRelay {
    pub fn new(target: impl Into<String>, attributes: AttributeSource) -> Self {
        Self {
            client: reqwest::Client::new(),
            target: target.into(),
            attributes,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn build_envelope(
        &self,
        headers: &HeaderMap,
        data: Value,
    ) -> Result<EventEnvelope, ValidationError> {
        let (event_type, source) = self.attributes.resolve(headers)?;
        EventEnvelope::new(event_type, source, data)
    }

    /// POST the envelope downstream. Only `202 Accepted` counts as delivered.
    pub async fn deliver(
        &self,
        envelope: &EventEnvelope,
        request_id: Option<&str>,
    ) -> Result<DeliveryReceipt, AppError> {
        let (mut headers, body) = encode(envelope).map_err(|e| {
            tracing::error!(event_id = %envelope.id(), "Failed to encode event: {}", e);
            AppError::InternalError(e.into())
        })?;
        inject_trace_headers(&mut headers, request_id);

        let response = self
            .client
            .post(&self.target)
            .headers(headers)
            .body(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                record_delivery("unreachable");
                if e.is_timeout() {
                    DeliveryError::Timeout(self.timeout)
                } else {
                    DeliveryError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    status = status.as_u16(),
                    "Failed to read downstream response body: {}",
                    e
                );
                String::new()
            }
        };

        if status != StatusCode::ACCEPTED {
            record_delivery("rejected");
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        record_delivery("accepted");
        tracing::info!(
            event_type = %envelope.event_type(),
            event_id = %envelope.id(),
            status = status.as_u16(),
            "sent message for event: {}. downstream response code {}",
            envelope.event_type(),
            status.as_u16()
        );

        Ok(DeliveryReceipt { status, body })
    }

    /// Validate, wrap and forward one inbound event.
    #[tracing::instrument(skip_all, fields(target = %self.target))]
    pub async fn relay(
        &self,
        headers: &HeaderMap,
        data: Value,
    ) -> Result<DeliveryReceipt, AppError> {
        let envelope = self.build_envelope(headers, data).map_err(|e| {
            tracing::debug!("Rejected inbound event: {}", e);
            e
        })?;
        let request_id = extract_request_id(headers);

        self.deliver(&envelope, request_id.as_deref()).await
    }
}
