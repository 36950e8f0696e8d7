//! relay/payload.rs
//!
//! Wire record for the telemetry relay: a flat JSON mapping with a
//! `type = "health"` discriminator, integer vital fields, and the
//! timestamp as float Unix-epoch seconds.
//!
//! Decoding is deliberately lenient: a mandatory field that is missing
//! or carries the wrong type falls back to 0 (or to the receive instant
//! for `time`), and an unusable optional vital decodes to absent. Only
//! a missing or foreign discriminator rejects the whole message.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::sample::HealthSample;

/// Discriminator value for vital-sign payloads. No other message types
/// are defined on this channel.
pub const HEALTH_PAYLOAD_TYPE: &str = "health";

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("Unexpected payload type: {0:?}")]
    UnexpectedType(String),
}

/// The flat wire mapping exchanged between the peers.
///
/// Serialization goes through the derive; decoding goes field by field
/// through [`HealthPayload::decode`] so one bad value cannot poison the
/// rest of the message.
#[derive(Clone, Debug, Serialize)]
pub struct HealthPayload {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(rename = "heartRate")]
    pub heart_rate: u32,

    pub steps: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spo2: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub systolic: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diastolic: Option<u32>,

    /// Unix-epoch seconds. Always emitted on encode; a payload without
    /// a usable value decodes against the receive instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

/// Read one integer field, treating a missing, mistyped, or
/// out-of-range value as absent.
fn vital_field(mapping: &Value, name: &str) -> Option<u32> {
    mapping
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

impl HealthPayload {
    /// Build the wire record for an outbound sample.
    pub fn from_sample(sample: &HealthSample) -> Self {
        Self {
            kind: HEALTH_PAYLOAD_TYPE.to_string(),
            heart_rate: sample.heart_rate,
            steps: sample.steps,
            spo2: sample.spo2,
            systolic: sample.systolic,
            diastolic: sample.diastolic,
            time: Some(sample.timestamp.timestamp_millis() as f64 / 1000.0),
        }
    }

    /// Serialize to wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>, PayloadError> {
        serde_json::to_vec(self).map_err(|e| PayloadError::Malformed(e.to_string()))
    }

    /// Parse wire bytes, rejecting anything that is not a `"health"`
    /// payload. Only the discriminator is strict: every other field
    /// falls back to its lenient default when missing or mistyped.
    pub fn decode(bytes: &[u8]) -> Result<Self, PayloadError> {
        let mapping: Value =
            serde_json::from_slice(bytes).map_err(|e| PayloadError::Malformed(e.to_string()))?;
        match mapping.get("type").and_then(Value::as_str) {
            Some(HEALTH_PAYLOAD_TYPE) => {}
            Some(other) => return Err(PayloadError::UnexpectedType(other.to_string())),
            None => {
                return Err(PayloadError::Malformed(
                    "missing \"type\" discriminator".to_string(),
                ))
            }
        }
        Ok(Self {
            kind: HEALTH_PAYLOAD_TYPE.to_string(),
            heart_rate: vital_field(&mapping, "heartRate").unwrap_or(0),
            steps: vital_field(&mapping, "steps").unwrap_or(0),
            spo2: vital_field(&mapping, "spo2"),
            systolic: vital_field(&mapping, "systolic"),
            diastolic: vital_field(&mapping, "diastolic"),
            time: mapping.get("time").and_then(Value::as_f64),
        })
    }

    /// Materialize a sample, substituting `received_at` when the payload
    /// carries no usable timestamp.
    pub fn into_sample(self, received_at: DateTime<Utc>) -> HealthSample {
        let timestamp = self
            .time
            .and_then(|secs| DateTime::from_timestamp_millis((secs * 1000.0).round() as i64))
            .unwrap_or(received_at);
        HealthSample {
            heart_rate: self.heart_rate,
            steps: self.steps,
            spo2: self.spo2,
            systolic: self.systolic,
            diastolic: self.diastolic,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_sample() -> HealthSample {
        HealthSample {
            heart_rate: 92,
            steps: 34,
            spo2: Some(98),
            systolic: Some(121),
            diastolic: Some(74),
            timestamp: DateTime::from_timestamp_millis(1_700_000_000_500).unwrap(),
        }
    }

    #[test]
    fn test_round_trip_reproduces_every_field() {
        let sample = full_sample();
        let bytes = HealthPayload::from_sample(&sample).encode().unwrap();
        let decoded = HealthPayload::decode(&bytes)
            .unwrap()
            .into_sample(Utc::now());
        assert_eq!(decoded, sample);
    }

    #[test]
    fn test_partial_payload_decodes_to_absent_vitals() {
        let bytes = br#"{"type":"health","heartRate":88,"steps":12,"time":1700000000.0}"#;
        let decoded = HealthPayload::decode(bytes).unwrap();
        assert_eq!(decoded.heart_rate, 88);
        assert_eq!(decoded.steps, 12);
        assert_eq!(decoded.spo2, None);
        assert_eq!(decoded.systolic, None);
        assert_eq!(decoded.diastolic, None);
    }

    #[test]
    fn test_mistyped_optional_vital_decodes_to_absent() {
        let bytes = br#"{"type":"health","heartRate":88,"steps":12,"spo2":"high"}"#;
        let decoded = HealthPayload::decode(bytes).unwrap();
        assert_eq!(decoded.heart_rate, 88);
        assert_eq!(decoded.steps, 12);
        assert_eq!(decoded.spo2, None);
    }

    #[test]
    fn test_mistyped_mandatory_field_defaults_to_zero() {
        let bytes = br#"{"type":"health","heartRate":"racing","steps":12,"spo2":97}"#;
        let decoded = HealthPayload::decode(bytes).unwrap();
        assert_eq!(decoded.heart_rate, 0);
        assert_eq!(decoded.steps, 12);
        assert_eq!(decoded.spo2, Some(97));
    }

    #[test]
    fn test_mistyped_time_falls_back_to_receive_instant() {
        let bytes = br#"{"type":"health","heartRate":70,"steps":5,"time":"noon"}"#;
        let received_at = DateTime::from_timestamp_millis(1_700_000_123_000).unwrap();
        let sample = HealthPayload::decode(bytes).unwrap().into_sample(received_at);
        assert_eq!(sample.timestamp, received_at);
    }

    #[test]
    fn test_negative_vital_decodes_to_absent() {
        let bytes = br#"{"type":"health","heartRate":80,"steps":-4,"diastolic":-1}"#;
        let decoded = HealthPayload::decode(bytes).unwrap();
        assert_eq!(decoded.steps, 0);
        assert_eq!(decoded.diastolic, None);
    }

    #[test]
    fn test_non_string_discriminator_is_malformed() {
        let bytes = br#"{"type":7,"heartRate":70,"steps":5}"#;
        assert!(matches!(
            HealthPayload::decode(bytes),
            Err(PayloadError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_mandatory_fields_default_to_zero() {
        let bytes = br#"{"type":"health"}"#;
        let decoded = HealthPayload::decode(bytes).unwrap();
        assert_eq!(decoded.heart_rate, 0);
        assert_eq!(decoded.steps, 0);
    }

    #[test]
    fn test_missing_time_falls_back_to_receive_instant() {
        let bytes = br#"{"type":"health","heartRate":70,"steps":5}"#;
        let received_at = DateTime::from_timestamp_millis(1_700_000_123_000).unwrap();
        let sample = HealthPayload::decode(bytes).unwrap().into_sample(received_at);
        assert_eq!(sample.timestamp, received_at);
    }

    #[test]
    fn test_foreign_discriminator_is_rejected() {
        let bytes = br#"{"type":"weather","heartRate":70}"#;
        let result = HealthPayload::decode(bytes);
        assert!(matches!(result, Err(PayloadError::UnexpectedType(kind)) if kind == "weather"));
    }

    #[test]
    fn test_missing_discriminator_is_malformed() {
        let bytes = br#"{"heartRate":70,"steps":5}"#;
        assert!(matches!(
            HealthPayload::decode(bytes),
            Err(PayloadError::Malformed(_))
        ));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let bytes = br#"{"type":"health","heartRate":64,"steps":2,"schemaHint":"v2"}"#;
        let decoded = HealthPayload::decode(bytes).unwrap();
        assert_eq!(decoded.heart_rate, 64);
    }

    #[test]
    fn test_absent_vitals_are_omitted_on_the_wire() {
        let payload = HealthPayload {
            kind: HEALTH_PAYLOAD_TYPE.to_string(),
            heart_rate: 75,
            steps: 10,
            spo2: None,
            systolic: None,
            diastolic: None,
            time: Some(1_700_000_000.0),
        };
        let text = String::from_utf8(payload.encode().unwrap()).unwrap();
        assert!(!text.contains("spo2"));
        assert!(!text.contains("systolic"));
    }
}
