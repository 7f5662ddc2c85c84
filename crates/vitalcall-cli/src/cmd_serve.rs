use std::path::PathBuf;
use std::sync::Arc;

use vitalcall_provider::{ProviderConfig, VapiClient};
use vitalcall_serve::ServeConfig;
use vitalcall_store::CallStore;

pub fn execute(bind: &str, port: u16, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let provider_config = ProviderConfig::from_env();
    if provider_config.api_key.is_none() {
        tracing::warn!("VAPI_PRIVATE_API_KEY is not set; provider requests will fail");
    }
    let config = ServeConfig {
        bind: bind.to_string(),
        port,
        list_limit: provider_config.list_limit,
    };
    let provider = Arc::new(VapiClient::new(provider_config));
    let store = data_dir.map(CallStore::new);
    tokio::runtime::Runtime::new()?.block_on(vitalcall_serve::serve(provider, store, config))
}
