//! Client-side error taxonomy.

use super::response::DecodeError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No response was received, including timeouts.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response other than validation or not-found.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The server rejected the filter input (400).
    #[error("{0}")]
    Validation(String),

    /// Single-entity lookup missed (404).
    #[error("{0}")]
    NotFound(String),

    #[error("could not decode response: {0}")]
    Decode(#[from] DecodeError),

    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Network("request timed out".to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}
