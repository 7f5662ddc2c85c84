use std::time::Duration;

use serde::de::DeserializeOwned;
use vitalcall_core::{CallId, RawCall};

use crate::{CallProvider, ProviderConfig, ProviderError};

/// Blocking client for the hosted voice platform's call API.
pub struct VapiClient {
    config: ProviderConfig,
    agent: ureq::Agent,
}

impl VapiClient {
    pub fn new(config: ProviderConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();
        Self { config, agent }
    }

    fn call_url(&self, id: &CallId) -> String {
        format!("{}/call/{}", self.config.base_url, id)
    }

    fn list_url(&self, limit: usize) -> String {
        format!("{}/call?limit={}", self.config.base_url, limit)
    }

    /// GET `url` and decode the JSON body, retrying transient failures.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey)?;

        let mut attempt = 0;
        loop {
            match self.get_once(url, key) {
                Ok(body) => return Ok(serde_json::from_str(&body)?),
                Err(err) if err.is_transient() && attempt < self.config.retries => {
                    attempt += 1;
                    tracing::warn!(url, attempt, error = %err, "retrying provider request");
                    std::thread::sleep(backoff(attempt));
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn get_once(&self, url: &str, key: &str) -> Result<String, ProviderError> {
        tracing::debug!(url, "provider request");
        let mut resp = self
            .agent
            .get(url)
            .header("Authorization", &format!("Bearer {key}"))
            .header("Content-Type", "application/json")
            .call()
            .map_err(map_transport_error)?;
        resp.body_mut()
            .with_config()
            .limit(self.config.max_body_bytes)
            .read_to_string()
            .map_err(map_transport_error)
    }
}

impl CallProvider for VapiClient {
    fn get_call(&self, id: &CallId) -> Result<RawCall, ProviderError> {
        self.get_json(&self.call_url(id)).map_err(|err| match err {
            ProviderError::Rejected { status: 404 } => ProviderError::NotFound(id.to_string()),
            other => other,
        })
    }

    fn list_calls(&self, limit: usize) -> Result<Vec<RawCall>, ProviderError> {
        let calls: Vec<RawCall> = self.get_json(&self.list_url(limit))?;
        tracing::debug!(count = calls.len(), "listed calls");
        Ok(calls)
    }
}

fn map_transport_error(err: ureq::Error) -> ProviderError {
    match err {
        ureq::Error::StatusCode(status) => ProviderError::Rejected { status },
        ureq::Error::BodyExceedsLimit(limit) => ProviderError::TooLarge { limit },
        other => ProviderError::Unavailable(other.to_string()),
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(200 * 2u64.pow(attempt.saturating_sub(1).min(4)))
}
