//! Pure pieces of the optimistic mutation protocol: phases, snapshots,
//! rollback decisions and the notices a mutation ends with.

mod error;
mod notice;
mod phase;
mod snapshot;

pub use error::MutationError;
pub use notice::{MutationKind, Notice, NoticeLevel};
pub use phase::{MutationPhase, MutationStatus};
pub use snapshot::{rollback_decision, MutationSnapshot, RollbackDecision, RollbackPolicy};
