use thiserror::Error;

/// Errors raised by pure schedule operations and caller-side validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Unknown collection: {0}")]
    UnknownKind(String),
    #[error("Unknown capacity group: {0}")]
    UnknownCapacityGroup(String),
    #[error("Batch is empty")]
    EmptyBatch,
    #[error("Session not found: {0}")]
    UnknownSession(String),
    #[error("Session {session_id} does not belong to section {section_id}")]
    ForeignSession {
        session_id: String,
        section_id: String,
    },
    #[error("Invalid session move: {0}")]
    InvalidMove(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_display() {
        assert_eq!(
            ScheduleError::UnknownKind("rooms".to_string()).to_string(),
            "Unknown collection: rooms"
        );
    }

    #[test]
    fn test_foreign_session_display() {
        let error = ScheduleError::ForeignSession {
            session_id: "s1".to_string(),
            section_id: "sec-9".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Session s1 does not belong to section sec-9"
        );
    }
}
