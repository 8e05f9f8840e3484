use thiserror::Error;

use crate::session::SessionError;

/// Every failure of a backend request, normalized
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request could not be sent: {0}")]
    Transport(String),

    #[error("Server responded with {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Session unavailable: {0}")]
    Session(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Session(err.to_string())
    }
}
