use std::path::{Path, PathBuf};

use clap::Subcommand;
use vitalcall_core::{format_for_list, normalize, CallId, CallPreview};
use vitalcall_provider::{CallProvider, ProviderConfig, VapiClient};
use vitalcall_store::CallStore;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum CallsCmd {
    /// List recent calls
    List {
        /// Maximum number of calls (default: VAPI_LIST_LIMIT or 50)
        #[arg(long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one call with extracted patient information
    Show {
        /// Call ID
        id: String,
    },
    /// Fetch one call and save it as a JSON snapshot
    Fetch {
        /// Call ID
        id: String,
        /// Snapshot directory
        #[arg(long, default_value = "extracted_data")]
        data_dir: PathBuf,
    },
}

// ── Dispatch ──

pub fn run(cmd: CallsCmd) -> anyhow::Result<()> {
    let config = ProviderConfig::from_env();
    let default_limit = config.list_limit;
    let client = VapiClient::new(config);

    match cmd {
        CallsCmd::List { limit, json } => {
            let previews = list(&client, limit.unwrap_or(default_limit))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&previews)?);
            } else {
                print!("{}", render_table(&previews));
            }
            Ok(())
        }
        CallsCmd::Show { id } => {
            let record = normalize(&client.get_call(&CallId::parse(&id)?)?, None);
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        CallsCmd::Fetch { id, data_dir } => {
            let path = fetch(&client, &id, &data_dir)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

// ── Command Implementations ──

fn list(provider: &dyn CallProvider, limit: usize) -> anyhow::Result<Vec<CallPreview>> {
    let calls = provider.list_calls(limit)?;
    Ok(format_for_list(&calls))
}

/// Fetch, normalize and save one call. Returns the snapshot path.
fn fetch(provider: &dyn CallProvider, id: &str, data_dir: &Path) -> anyhow::Result<PathBuf> {
    let id = CallId::parse(id)?;
    let record = normalize(&provider.get_call(&id)?, None);
    let saved = CallStore::new(data_dir).save(&id, &record)?;
    Ok(saved.path)
}

fn render_table(previews: &[CallPreview]) -> String {
    if previews.is_empty() {
        return "(no calls)\n".to_string();
    }
    let mut out = format!(
        "{:<38} {:<12} {:>9} {:>5}  {}\n",
        "ID", "STATUS", "DURATION", "MSGS", "PREVIEW"
    );
    for p in previews {
        let duration = p
            .duration
            .map(|d| format!("{:.2}m", d.minutes))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<38} {:<12} {:>9} {:>5}  {}\n",
            p.id.as_deref().unwrap_or("-"),
            p.status.as_ref().map(|s| s.as_str()).unwrap_or("-"),
            duration,
            p.message_count,
            p.transcript_preview.replace('\n', " "),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalcall_core::RawCall;
    use vitalcall_provider::ProviderError;

    struct OneCall(RawCall);

    impl CallProvider for OneCall {
        fn get_call(&self, id: &CallId) -> Result<RawCall, ProviderError> {
            if self.0.id.as_deref() == Some(id.as_str()) {
                Ok(self.0.clone())
            } else {
                Err(ProviderError::NotFound(id.to_string()))
            }
        }

        fn list_calls(&self, limit: usize) -> Result<Vec<RawCall>, ProviderError> {
            Ok(std::iter::once(self.0.clone()).take(limit).collect())
        }
    }

    fn provider() -> OneCall {
        OneCall(
            serde_json::from_value(serde_json::json!({
                "id": "abc",
                "status": "ended",
                "startedAt": "2024-01-01T00:00:00Z",
                "endedAt": "2024-01-01T00:01:30Z",
                "artifact": {"transcript": "AI: Hi\nUser: call me Mo"}
            }))
            .unwrap(),
        )
    }

    #[test]
    fn fetch_writes_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let path = fetch(&provider(), "abc", tmp.path()).unwrap();
        assert!(path.is_file());
        let snapshot = CallStore::load(&path).unwrap();
        assert_eq!(
            snapshot.record.extracted_patient_info.name.as_deref(),
            Some("Mo")
        );
    }

    #[test]
    fn fetch_names_snapshot_after_requested_id() {
        let tmp = tempfile::tempdir().unwrap();
        let data_dir = tmp.path().join("extracted_data");
        let mut p = provider();
        p.0.id = Some("../../escaped".to_string());
        // The provider answers "abc" with a call carrying a different id.
        struct Renamed(RawCall);
        impl CallProvider for Renamed {
            fn get_call(&self, _id: &CallId) -> Result<RawCall, ProviderError> {
                Ok(self.0.clone())
            }
            fn list_calls(&self, _limit: usize) -> Result<Vec<RawCall>, ProviderError> {
                Ok(vec![])
            }
        }

        let path = fetch(&Renamed(p.0), "abc", &data_dir).unwrap();
        assert_eq!(path.parent(), Some(data_dir.as_path()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("call_data_abc_"));
    }

    #[test]
    fn fetch_rejects_empty_id() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(fetch(&provider(), "  ", tmp.path()).is_err());
    }

    #[test]
    fn fetch_reports_missing_call() {
        let tmp = tempfile::tempdir().unwrap();
        let err = fetch(&provider(), "zzz", tmp.path()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn table_shows_duration_and_flattened_preview() {
        let previews = list(&provider(), 10).unwrap();
        let table = render_table(&previews);
        let row = table.lines().nth(1).unwrap();
        assert!(row.starts_with("abc"));
        assert!(row.contains("ended"));
        assert!(row.contains("1.50m"));
        assert!(row.contains("AI: Hi User: call me Mo"));
    }

    #[test]
    fn empty_table() {
        assert_eq!(render_table(&[]), "(no calls)\n");
    }
}
