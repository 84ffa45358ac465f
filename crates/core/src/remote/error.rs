use thiserror::Error;

/// Errors returned by the remote authority or the transport reaching it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Non-2xx response. `message` carries the server's explanation, if any.
    #[error("HTTP error! status: {status}")]
    Http {
        status: u16,
        message: Option<String>,
    },
    /// The request never produced a response.
    #[error("{0}")]
    Network(String),
    /// A 2xx response whose body could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// Creates an HTTP error without a server message.
    pub fn status(status: u16) -> Self {
        RemoteError::Http {
            status,
            message: None,
        }
    }

    /// Returns the HTTP status code, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RemoteError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the server-supplied explanation, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RemoteError::Http {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Result type for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_display_uses_status_only() {
        let error = RemoteError::Http {
            status: 404,
            message: Some("Session not found".to_string()),
        };
        assert_eq!(error.to_string(), "HTTP error! status: 404");
    }

    #[test]
    fn test_network_display_is_transport_message() {
        let error = RemoteError::Network("connection refused".to_string());
        assert_eq!(error.to_string(), "connection refused");
    }

    #[test]
    fn test_invalid_response_display() {
        let error = RemoteError::InvalidResponse("expected array".to_string());
        assert_eq!(error.to_string(), "Invalid response: expected array");
    }

    #[test]
    fn test_status_code() {
        assert_eq!(RemoteError::status(500).status_code(), Some(500));
        assert_eq!(RemoteError::Network("x".to_string()).status_code(), None);
    }

    #[test]
    fn test_blank_server_message_is_none() {
        let error = RemoteError::Http {
            status: 400,
            message: Some("  ".to_string()),
        };
        assert_eq!(error.server_message(), None);
    }
}
