use serde::{Deserialize, Serialize};

/// Lifecycle state reported by the call provider.
///
/// Unknown states are kept verbatim in `Other` so a new provider status never
/// fails deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallStatus {
    Queued,
    Ringing,
    InProgress,
    Forwarding,
    Ended,
    #[serde(untagged)]
    Other(String),
}

impl CallStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CallStatus::Queued => "queued",
            CallStatus::Ringing => "ringing",
            CallStatus::InProgress => "in-progress",
            CallStatus::Forwarding => "forwarding",
            CallStatus::Ended => "ended",
            CallStatus::Other(s) => s,
        }
    }
}

/// One turn of the conversation as recorded by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds_from_start: Option<f64>,
    /// Provider fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Post-call artifacts: transcript, messages and recording links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<CallMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stereo_recording_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcap_url: Option<String>,
}

/// A call exactly as the provider returns it. Every field is optional: a
/// missing artifact or timestamp is tolerated, never fatal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub call_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CallStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_breakdown: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<Artifact>,
}

impl RawCall {
    /// Transcript text, or `""` when the artifact or transcript is missing.
    pub fn transcript(&self) -> &str {
        self.artifact
            .as_ref()
            .and_then(|a| a.transcript.as_deref())
            .unwrap_or("")
    }

    /// Conversation messages, or an empty slice when missing.
    pub fn messages(&self) -> &[CallMessage] {
        self.artifact
            .as_ref()
            .and_then(|a| a.messages.as_deref())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_known_and_unknown_values() {
        let ended: CallStatus = serde_json::from_str(r#""ended""#).unwrap();
        assert_eq!(ended, CallStatus::Ended);
        let in_progress: CallStatus = serde_json::from_str(r#""in-progress""#).unwrap();
        assert_eq!(in_progress, CallStatus::InProgress);

        let other: CallStatus = serde_json::from_str(r#""on-hold""#).unwrap();
        assert_eq!(other, CallStatus::Other("on-hold".into()));
        assert_eq!(serde_json::to_string(&other).unwrap(), r#""on-hold""#);
    }

    #[test]
    fn raw_call_tolerates_missing_fields() {
        let call: RawCall = serde_json::from_str(r#"{"id":"c1"}"#).unwrap();
        assert_eq!(call.id.as_deref(), Some("c1"));
        assert!(call.artifact.is_none());
        assert_eq!(call.transcript(), "");
        assert!(call.messages().is_empty());
    }

    #[test]
    fn raw_call_reads_provider_shape() {
        let json = serde_json::json!({
            "id": "c2",
            "type": "webCall",
            "status": "ended",
            "startedAt": "2024-01-01T00:00:00Z",
            "endedAt": "2024-01-01T00:01:00Z",
            "cost": 0.12,
            "endedReason": "customer-ended-call",
            "artifact": {
                "transcript": "AI: Hello\nUser: Hi",
                "messages": [
                    {"role": "bot", "message": "Hello", "secondsFromStart": 0.5, "source": "x"}
                ],
                "recordingUrl": "https://example.com/r.wav"
            }
        });
        let call: RawCall = serde_json::from_value(json).unwrap();
        assert_eq!(call.call_type.as_deref(), Some("webCall"));
        assert_eq!(call.status, Some(CallStatus::Ended));
        assert_eq!(call.transcript(), "AI: Hello\nUser: Hi");
        let msgs = call.messages();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].role.as_deref(), Some("bot"));
        assert_eq!(msgs[0].seconds_from_start, Some(0.5));
        assert_eq!(msgs[0].extra["source"], "x");
    }
}
