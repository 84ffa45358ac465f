//! User-facing mutation notices.

use std::fmt;

use serde::Serialize;

use crate::remote::{classify_failure, failure_message, FailureClass, RemoteError};

/// The mutation a notice reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    DeleteSession,
    DeleteSessions,
    UpdateSessionTimes,
    /// Caller-driven mutations routed through the generic entry point.
    Custom(&'static str),
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::DeleteSession => "delete_session",
            MutationKind::DeleteSessions => "delete_sessions",
            MutationKind::UpdateSessionTimes => "update_session_times",
            MutationKind::Custom(name) => name,
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            MutationKind::DeleteSession => "Session deleted",
            MutationKind::DeleteSessions => "Sessions deleted",
            MutationKind::UpdateSessionTimes => "Sessions updated",
            MutationKind::Custom(_) => "Changes saved",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// One notification emitted at the end of a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub kind: MutationKind,
    #[serde(skip)]
    pub class: Option<FailureClass>,
    pub message: String,
}

impl Notice {
    pub fn success(kind: MutationKind) -> Self {
        Self {
            level: NoticeLevel::Success,
            kind,
            class: None,
            message: kind.success_message().to_string(),
        }
    }

    pub fn failure(kind: MutationKind, error: &RemoteError) -> Self {
        Self {
            level: NoticeLevel::Error,
            kind,
            class: Some(classify_failure(error)),
            message: failure_message(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
