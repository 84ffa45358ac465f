//! Pure classification of remote failures for user-facing reporting.

use super::RemoteError;

/// Why a remote call failed, from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The server rejected the request contents (400, 422).
    Validation,
    /// The request collides with the current server state (409).
    Conflict,
    NotFound,
    /// The session is missing or lacks permission (401, 403).
    Unauthorized,
    /// The server failed (5xx or any other status).
    Server,
    /// No response arrived.
    Network,
    /// A response arrived but could not be understood.
    InvalidResponse,
}

impl FailureClass {
    /// Returns a message suitable when the server supplied none.
    pub fn generic_message(&self) -> &'static str {
        match self {
            FailureClass::Validation => "The request was rejected as invalid",
            FailureClass::Conflict => "The change conflicts with the current schedule",
            FailureClass::NotFound => "The item no longer exists",
            FailureClass::Unauthorized => "You are not allowed to perform this change",
            FailureClass::Server => "The server could not complete the request",
            FailureClass::Network => "Could not reach the server, check your connection",
            FailureClass::InvalidResponse => "The server sent an unexpected response",
        }
    }

    /// Returns true for failures caused by the request itself rather than
    /// by the transport or the server.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            FailureClass::Validation
                | FailureClass::Conflict
                | FailureClass::NotFound
                | FailureClass::Unauthorized
        )
    }
}

/// Maps a [`RemoteError`] to its [`FailureClass`].
///
/// # Examples
///
/// ```
/// use timetable_core::remote::{classify_failure, FailureClass, RemoteError};
///
/// assert_eq!(classify_failure(&RemoteError::status(409)), FailureClass::Conflict);
/// assert_eq!(
///     classify_failure(&RemoteError::Network("timeout".to_string())),
///     FailureClass::Network
/// );
/// ```
pub fn classify_failure(error: &RemoteError) -> FailureClass {
    match error {
        RemoteError::Http { status, .. } => match status {
            400 | 422 => FailureClass::Validation,
            401 | 403 => FailureClass::Unauthorized,
            404 => FailureClass::NotFound,
            409 => FailureClass::Conflict,
            _ => FailureClass::Server,
        },
        RemoteError::Network(_) => FailureClass::Network,
        RemoteError::InvalidResponse(_) => FailureClass::InvalidResponse,
    }
}

/// Returns the text shown to the user for a failure: the server's own
/// explanation when present, otherwise the generic message of its class.
pub fn failure_message(error: &RemoteError) -> String {
    error
        .server_message()
        .map(str::to_string)
        .unwrap_or_else(|| classify_failure(error).generic_message().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_statuses() {
        assert_eq!(classify_failure(&RemoteError::status(400)), FailureClass::Validation);
        assert_eq!(classify_failure(&RemoteError::status(422)), FailureClass::Validation);
    }

    #[test]
    fn test_conflict_maps_from_409() {
        assert_eq!(classify_failure(&RemoteError::status(409)), FailureClass::Conflict);
    }

    #[test]
    fn test_auth_statuses() {
        assert_eq!(classify_failure(&RemoteError::status(401)), FailureClass::Unauthorized);
        assert_eq!(classify_failure(&RemoteError::status(403)), FailureClass::Unauthorized);
    }

    #[test]
    fn test_server_statuses() {
        assert_eq!(classify_failure(&RemoteError::status(500)), FailureClass::Server);
        assert_eq!(classify_failure(&RemoteError::status(503)), FailureClass::Server);
        assert_eq!(classify_failure(&RemoteError::status(418)), FailureClass::Server);
    }

    #[test]
    fn test_transport_failures() {
        assert_eq!(
            classify_failure(&RemoteError::Network("reset".to_string())),
            FailureClass::Network
        );
        assert_eq!(
            classify_failure(&RemoteError::InvalidResponse("eof".to_string())),
            FailureClass::InvalidResponse
        );
    }

    #[test]
    fn test_server_message_wins() {
        let error = RemoteError::Http {
            status: 409,
            message: Some("Room already booked".to_string()),
        };
        assert_eq!(failure_message(&error), "Room already booked");
    }

    #[test]
    fn test_generic_message_fallback() {
        assert_eq!(
            failure_message(&RemoteError::status(409)),
            "The change conflicts with the current schedule"
        );
    }

    #[test]
    fn test_client_fault() {
        assert!(FailureClass::Conflict.is_client_fault());
        assert!(!FailureClass::Network.is_client_fault());
    }
}
