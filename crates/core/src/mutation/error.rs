use thiserror::Error;

use crate::schedule::ScheduleError;

use super::MutationPhase;

/// Errors raised before a mutation reaches the remote authority.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("Invalid mutation transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: MutationPhase,
        to: MutationPhase,
    },
    #[error("Validation failed: {0}")]
    Validation(#[from] ScheduleError),
}
