//! Client error types.

use thiserror::Error;
use timetable_core::remote::RemoteError;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ClientError> for RemoteError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::ServerError { status, message } => RemoteError::Http {
                status,
                message: extract_message(&message),
            },
            ClientError::Request(e) if e.is_decode() => RemoteError::InvalidResponse(e.to_string()),
            ClientError::Request(e) => match e.status() {
                Some(status) => RemoteError::status(status.as_u16()),
                None => RemoteError::Network(e.to_string()),
            },
            ClientError::InvalidResponse(message) => RemoteError::InvalidResponse(message),
            ClientError::Json(e) => RemoteError::InvalidResponse(e.to_string()),
        }
    }
}

/// Pulls a human-readable explanation out of an error body.
///
/// JSON bodies contribute their `message` field; other non-empty bodies are
/// used verbatim.
pub fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        Err(_) => Some(body.to_string()),
    }
}
