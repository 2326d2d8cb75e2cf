use crchat_api::ApiError;
use std::fmt;
use thiserror::Error;

/// Config fields that must not be empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    BaseUrl,
    ModelName,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigField::BaseUrl => f.write_str("Ollama URL"),
            ConfigField::ModelName => f.write_str("Model name"),
        }
    }
}

/// Failure of a key-value store or file sink
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("corrupt stored data: {0}")]
    Corrupt(String),
}

/// Errors surfaced by the session controller. All are recoverable.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Stored config could not be read or parsed
    #[error("Failed to load saved configuration: {0}")]
    ConfigLoad(String),
    /// Config could not be serialized for storage
    #[error("Failed to encode configuration: {0}")]
    ConfigEncode(#[from] serde_json::Error),
    /// A required field was left empty on save
    #[error("{field} is required")]
    ConfigValidation { field: ConfigField },
    /// Network failure or malformed server response
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SessionError::ConfigValidation { .. })
    }
}
