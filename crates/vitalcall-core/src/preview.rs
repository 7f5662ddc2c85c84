use serde::{Deserialize, Serialize};

use crate::duration::{compute_duration, CallDuration};
use crate::types::{CallStatus, RawCall};

/// Number of transcript characters kept in a preview (ellipsis not counted).
pub const PREVIEW_CHARS: usize = 100;

/// Condensed call shape for list views. Carries no patient information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallPreview {
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
    pub ended_reason: Option<String>,
    pub has_transcript: bool,
    pub transcript_preview: String,
    pub message_count: usize,
}

impl CallPreview {
    pub fn from_raw(raw: &RawCall) -> Self {
        let transcript = raw.transcript();
        Self {
            id: raw.id.clone(),
            call_type: raw.call_type.clone(),
            status: raw.status.clone(),
            started_at: raw.started_at.clone(),
            ended_at: raw.ended_at.clone(),
            duration: compute_duration(raw.started_at.as_deref(), raw.ended_at.as_deref()),
            cost: raw.cost,
            ended_reason: raw.ended_reason.clone(),
            has_transcript: !transcript.is_empty(),
            transcript_preview: truncate_preview(transcript, PREVIEW_CHARS),
            message_count: raw.messages().len(),
        }
    }
}

/// One preview per call, in input order.
pub fn format_for_list(calls: &[RawCall]) -> Vec<CallPreview> {
    calls.iter().map(CallPreview::from_raw).collect()
}

/// First `max_chars` characters, plus `...` only when something was cut.
fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
