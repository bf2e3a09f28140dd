//! Shared error types.

use thiserror::Error;

/// Failure to turn a wire frame into something the client understands.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("frame is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// API error type for the auxiliary HTTP fetches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl ApiError {
    /// Message suitable for showing next to a retry button.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Gateway unreachable. Check the connection and retry.".to_string()
            }
            ApiError::Http { status, .. } => format!("Gateway answered with HTTP {status}. Retry?"),
            ApiError::Deserialize(_) => "Gateway sent an unexpected response. Retry?".to_string(),
        }
    }
}
