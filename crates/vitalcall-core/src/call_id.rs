use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallIdError {
    #[error("Call ID is required")]
    Empty,

    #[error("Call ID contains invalid character {0:?}")]
    InvalidChar(char),
}

/// Validated provider call identifier.
///
/// Ends up in a provider URL path and in snapshot file names, so only
/// `[A-Za-z0-9_-]` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallId(String);

impl CallId {
    pub fn parse(raw: &str) -> Result<Self, CallIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CallIdError::Empty);
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(CallIdError::InvalidChar(bad));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
