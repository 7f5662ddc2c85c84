use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.vapi.ai";
pub const DEFAULT_LIST_LIMIT: usize = 50;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RETRIES: u32 = 2;
/// ureq stops at 10 MiB unless told otherwise; a full page of calls with
/// transcripts and message logs can exceed that.
pub const DEFAULT_MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Provider connection settings.
#[derive(Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub list_limit: usize,
    pub timeout: Duration,
    /// Extra attempts for transient failures.
    pub retries: u32,
    pub max_body_bytes: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            list_limit: DEFAULT_LIST_LIMIT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retries: DEFAULT_RETRIES,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

// Keeps the key out of debug logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("list_limit", &self.list_limit)
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl ProviderConfig {
    /// Load from `VAPI_PRIVATE_API_KEY`, `VAPI_BASE_URL`, `VAPI_LIST_LIMIT`,
    /// `VAPI_TIMEOUT_SECS`, `VAPI_RETRIES` and `VAPI_MAX_BODY_BYTES`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ProviderConfig::from_env`] with a custom variable source.
    /// Blank values are treated as unset; unparseable numbers fall back to
    /// the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            base_url: get("VAPI_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            api_key: get("VAPI_PRIVATE_API_KEY").map(|v| v.trim().to_string()),
            list_limit: get("VAPI_LIST_LIMIT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.list_limit),
            timeout: get("VAPI_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            retries: get("VAPI_RETRIES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.retries),
            max_body_bytes: get("VAPI_MAX_BODY_BYTES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_body_bytes),
        }
    }
}
