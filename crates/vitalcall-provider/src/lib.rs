mod config;
mod error;
mod vapi;

pub use config::ProviderConfig;
pub use error::ProviderError;
pub use vapi::VapiClient;

use vitalcall_core::{CallId, RawCall};

/// Source of call history. Implementations block until the provider answers.
pub trait CallProvider: Send + Sync {
    /// Fetch a single call by id.
    fn get_call(&self, id: &CallId) -> Result<RawCall, ProviderError>;

    /// Fetch the most recent calls, at most `limit` of them.
    fn list_calls(&self, limit: usize) -> Result<Vec<RawCall>, ProviderError>;
}
