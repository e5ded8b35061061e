use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::ValidationError;

/// CloudEvents specification version produced and accepted by this crate.
pub const SPEC_VERSION: &str = "1.0";

/// A CloudEvents 1.0 event wrapping an opaque JSON payload.
///
/// Fields are private so an envelope cannot change after construction;
/// `type` and `source` are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    specversion: String,
    id: String,
    source: String,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<DateTime<Utc>>,
    #[serde(default)]
    data: Value,
}

impl EventEnvelope {
    /// Build a new envelope with a fresh id and the current time.
    pub fn new(
        event_type: impl Into<String>,
        source: impl Into<String>,
        data: Value,
    ) -> Result<Self, ValidationError> {
        let envelope = Self {
            specversion: SPEC_VERSION.to_string(),
            id: Uuid::new_v4().to_string(),
            source: source.into(),
            event_type: event_type.into(),
            time: Some(Utc::now()),
            data,
        };
        envelope.validate()?;
        Ok(envelope)
    }

    /// Check the attribute invariants. Used after deserializing foreign input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.event_type.trim().is_empty() {
            return Err(ValidationError::EmptyAttribute("type"));
        }
        if self.source.trim().is_empty() {
            return Err(ValidationError::EmptyAttribute("source"));
        }
        if self.id.is_empty() {
            return Err(ValidationError::EmptyAttribute("id"));
        }
        Ok(())
    }

    pub fn spec_version(&self) -> &str {
        &self.specversion
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn data(&self) -> &Value {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_envelope_carries_attributes_and_payload() {
        let envelope =
            EventEnvelope::new("dev.example.created", "svc-a", json!({"id": 1})).unwrap();

        assert_eq!(envelope.spec_version(), SPEC_VERSION);
        assert_eq!(envelope.event_type(), "dev.example.created");
        assert_eq!(envelope.source(), "svc-a");
        assert_eq!(envelope.data(), &json!({"id": 1}));
        assert!(Uuid::parse_str(envelope.id()).is_ok());
    }

    #[test]
    fn each_envelope_gets_its_own_id() {
        let a = EventEnvelope::new("t", "s", Value::Null).unwrap();
        let b = EventEnvelope::new("t", "s", Value::Null).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn empty_type_is_rejected() {
        let err = EventEnvelope::new("", "svc-a", json!({})).unwrap_err();
        assert_eq!(err, ValidationError::EmptyAttribute("type"));
    }

    #[test]
    fn blank_source_is_rejected() {
        let err = EventEnvelope::new("dev.example.created", "  ", json!({})).unwrap_err();
        assert_eq!(err, ValidationError::EmptyAttribute("source"));
    }

    #[test]
    fn serializes_type_under_its_cloudevents_name() {
        let envelope = EventEnvelope::new("dev.kafka.type", "dev.kafka.source", json!([1, 2]))
            .unwrap();
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["type"], "dev.kafka.type");
        assert_eq!(value["source"], "dev.kafka.source");
        assert_eq!(value["specversion"], "1.0");
        assert_eq!(value["data"], json!([1, 2]));
        assert!(value.get("event_type").is_none());
    }
}
