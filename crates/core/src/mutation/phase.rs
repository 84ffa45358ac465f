//! The per-mutation state machine.
//!
//! ```text
//! Idle -> SnapshotTaken -> OptimisticApplied -> RemotePending -> Committed
//!                                                            \-> RolledBack
//! ```

use serde::Serialize;

use super::MutationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MutationPhase {
    Idle,
    SnapshotTaken,
    OptimisticApplied,
    RemotePending,
    Committed,
    RolledBack,
}

impl MutationPhase {
    /// Returns true if `next` directly follows `self`.
    pub fn can_advance_to(&self, next: MutationPhase) -> bool {
        use MutationPhase::*;
        matches!(
            (self, next),
            (Idle, SnapshotTaken)
                | (SnapshotTaken, OptimisticApplied)
                | (OptimisticApplied, RemotePending)
                | (RemotePending, Committed)
                | (RemotePending, RolledBack)
        )
    }

    /// Moves to `next`, rejecting skipped or reordered steps.
    pub fn advance(self, next: MutationPhase) -> Result<MutationPhase, MutationError> {
        if self.can_advance_to(next) {
            Ok(next)
        } else {
            Err(MutationError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MutationPhase::Committed | MutationPhase::RolledBack)
    }

    /// Collapses the phase into the coarse status consumers poll.
    pub fn status(&self) -> MutationStatus {
        match self {
            MutationPhase::Idle => MutationStatus::Idle,
            MutationPhase::Committed => MutationStatus::Success,
            MutationPhase::RolledBack => MutationStatus::Error,
            _ => MutationStatus::Pending,
        }
    }
}

/// What a consumer sees of a mutation: `is_pending`, `is_error`, `is_success`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

impl MutationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationStatus::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MutationStatus::Success)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MutationStatus::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let phase = MutationPhase::Idle
            .advance(MutationPhase::SnapshotTaken)
            .and_then(|p| p.advance(MutationPhase::OptimisticApplied))
            .and_then(|p| p.advance(MutationPhase::RemotePending))
            .and_then(|p| p.advance(MutationPhase::Committed))
            .unwrap();

        assert!(phase.is_terminal());
        assert!(phase.status().is_success());
    }

    #[test]
    fn test_rollback_only_from_remote_pending() {
        assert!(MutationPhase::RemotePending.can_advance_to(MutationPhase::RolledBack));
        assert!(!MutationPhase::OptimisticApplied.can_advance_to(MutationPhase::RolledBack));
    }

    #[test]
    fn test_cannot_skip_optimistic_apply() {
        let result = MutationPhase::SnapshotTaken.advance(MutationPhase::RemotePending);
        assert_eq!(
            result,
            Err(MutationError::InvalidTransition {
                from: MutationPhase::SnapshotTaken,
                to: MutationPhase::RemotePending,
            })
        );
    }

    #[test]
    fn test_terminal_phases_are_final() {
        for next in [
            MutationPhase::Idle,
            MutationPhase::SnapshotTaken,
            MutationPhase::RemotePending,
            MutationPhase::Committed,
        ] {
            assert!(!MutationPhase::Committed.can_advance_to(next));
            assert!(!MutationPhase::RolledBack.can_advance_to(next));
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(MutationPhase::Idle.status(), MutationStatus::Idle);
        assert!(MutationPhase::SnapshotTaken.status().is_pending());
        assert!(MutationPhase::RemotePending.status().is_pending());
        assert!(MutationPhase::RolledBack.status().is_error());
    }
}
