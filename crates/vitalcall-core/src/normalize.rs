use serde::{Deserialize, Serialize};

use crate::duration::{compute_duration, CallDuration};
use crate::extract::{extract, PatientInfo};
use crate::types::{CallMessage, CallStatus, RawCall};

/// Recording links copied from the call artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stereo_recording_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcap_url: Option<String>,
}

/// Canonical detail view of one call: provider metadata, computed duration
/// and the extracted patient information.
///
/// Provider fields missing on input are omitted on output. `duration` is
/// always present and `null` when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
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
    pub duration: Option<CallDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_breakdown: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_reason: Option<String>,
    pub transcript: String,
    pub messages: Vec<CallMessage>,
    pub extracted_patient_info: PatientInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_id: Option<String>,
    pub artifact: RecordingLinks,
}

/// Build the canonical record for `raw`.
///
/// `messages` overrides the artifact's message list when given.
pub fn normalize(raw: &RawCall, messages: Option<Vec<CallMessage>>) -> CallRecord {
    let transcript = raw.transcript();
    let messages = messages.unwrap_or_else(|| raw.messages().to_vec());
    let artifact = raw
        .artifact
        .as_ref()
        .map(|a| RecordingLinks {
            recording_url: a.recording_url.clone(),
            stereo_recording_url: a.stereo_recording_url.clone(),
            pcap_url: a.pcap_url.clone(),
        })
        .unwrap_or_default();

    CallRecord {
        id: raw.id.clone(),
        call_type: raw.call_type.clone(),
        status: raw.status.clone(),
        started_at: raw.started_at.clone(),
        ended_at: raw.ended_at.clone(),
        duration: compute_duration(raw.started_at.as_deref(), raw.ended_at.as_deref()),
        cost: raw.cost,
        cost_breakdown: raw.cost_breakdown.clone(),
        ended_reason: raw.ended_reason.clone(),
        transcript: transcript.to_string(),
        messages,
        extracted_patient_info: extract(transcript),
        analysis: raw.analysis.clone(),
        assistant_id: raw.assistant_id.clone(),
        phone_number_id: raw.phone_number_id.clone(),
        artifact,
    }
}
