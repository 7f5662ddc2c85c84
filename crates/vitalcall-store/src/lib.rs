use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use vitalcall_core::{CallId, CallRecord};

/// Value of `source` in every snapshot written by this crate.
pub const SNAPSHOT_SOURCE: &str = "post-call-api-extraction";

/// On-disk snapshot: the call record plus when and how it was extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSnapshot {
    #[serde(flatten)]
    pub record: CallRecord,
    pub extracted_at: String,
    pub source: String,
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCall {
    pub file_name: String,
    pub path: PathBuf,
}

/// Directory of JSON call snapshots.
#[derive(Debug, Clone)]
pub struct CallStore {
    dir: PathBuf,
}

impl CallStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `record` as `call_data_<id>_<unix millis>.json`.
    ///
    /// The file name comes from the validated `id` the caller requested,
    /// never from `record.id`, which is whatever the provider sent back.
    pub fn save(&self, id: &CallId, record: &CallRecord) -> anyhow::Result<SavedCall> {
        self.save_at(id, record, OffsetDateTime::now_utc())
    }

    fn save_at(
        &self,
        id: &CallId,
        record: &CallRecord,
        now: OffsetDateTime,
    ) -> anyhow::Result<SavedCall> {
        let call_id = id.as_str();
        let file_name = snapshot_file_name(call_id, now);
        let path = self.dir.join(&file_name);

        let snapshot = CallSnapshot {
            record: record.clone(),
            extracted_at: now.format(&Rfc3339)?,
            source: SNAPSHOT_SOURCE.to_string(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        write_atomic(&path, json.as_bytes())?;

        tracing::info!(call_id, file = %file_name, "saved call snapshot");
        Ok(SavedCall { file_name, path })
    }

    /// Read a snapshot back.
    pub fn load(path: &Path) -> anyhow::Result<CallSnapshot> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// `call_data_<id>_<unix millis>.json`
pub fn snapshot_file_name(call_id: &str, at: OffsetDateTime) -> String {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    format!("call_data_{call_id}_{millis}.json")
}

/// Write `data` to a temp file in the same directory, then rename it over `path`.
pub fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}
