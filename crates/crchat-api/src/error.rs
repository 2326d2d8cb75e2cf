use thiserror::Error;

/// Failure talking to the model server
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },
    /// The request never produced a response (connection refused, DNS, ...)
    #[error("{0}")]
    Transport(String),
    /// Success status, but the body lacks the expected fields
    #[error("Invalid response format from Ollama: {0}")]
    ResponseFormat(String),
}

impl ApiError {
    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::ResponseFormat(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}
