use serde::Serialize;
use serde_json::Value;

use stogra_core::UtcDateTime;

/// Command metadata printed alongside every payload.
///
/// Field order is fixed to keep the JSON output stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub command: &'static str,
    pub provider: &'static str,
    pub generated_at: String,
    pub latency_ms: u64,
}

impl Metadata {
    pub fn new(command: &'static str, provider: &'static str, latency_ms: u64) -> Self {
        Self {
            command,
            provider,
            generated_at: UtcDateTime::now().format_rfc3339(),
            latency_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub meta: Metadata,
    pub data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_meta_before_data() {
        let envelope = Envelope {
            meta: Metadata {
                command: "status",
                provider: "fixture",
                generated_at: String::from("2026-03-02T16:00:00Z"),
                latency_ms: 3,
            },
            data: serde_json::json!({ "isOpen": true }),
        };

        let json = serde_json::to_string(&envelope).expect("serializable");
        assert_eq!(
            json,
            r#"{"meta":{"command":"status","provider":"fixture","generated_at":"2026-03-02T16:00:00Z","latency_ms":3},"data":{"isOpen":true}}"#
        );
    }

    #[test]
    fn new_stamps_the_current_time() {
        let meta = Metadata::new("news", "yahoo", 12);
        assert!(meta.generated_at.ends_with('Z'));
        assert_eq!(meta.latency_ms, 12);
    }
}
