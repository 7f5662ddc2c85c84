use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Vapi API key not configured")]
    MissingApiKey,

    #[error("call not found: {0}")]
    NotFound(String),

    #[error("provider rejected request with status {status}")]
    Rejected { status: u16 },

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider response exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("unexpected provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ProviderError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Unavailable(_) => true,
            ProviderError::Rejected { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_kinds() {
        assert!(ProviderError::Unavailable("timeout".into()).is_transient());
        assert!(ProviderError::Rejected { status: 503 }.is_transient());
        assert!(ProviderError::Rejected { status: 429 }.is_transient());
        assert!(!ProviderError::Rejected { status: 401 }.is_transient());
        assert!(!ProviderError::NotFound("c1".into()).is_transient());
        assert!(!ProviderError::MissingApiKey.is_transient());
        assert!(!ProviderError::TooLarge { limit: 1024 }.is_transient());
    }

    #[test]
    fn missing_key_message() {
        assert_eq!(
            ProviderError::MissingApiKey.to_string(),
            "Vapi API key not configured"
        );
    }
}
