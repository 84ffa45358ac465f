use serde::{Deserialize, Serialize};

/// An owned copy of a collection taken immediately before an optimistic
/// apply. Belongs to exactly one mutation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationSnapshot<T> {
    items: Vec<T>,
    version: u64,
}

impl<T> MutationSnapshot<T> {
    /// `version` is the collection version the copy was taken at.
    pub fn new(items: Vec<T>, version: u64) -> Self {
        Self { items, version }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// How a failed mutation treats state written after its optimistic apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollbackPolicy {
    /// Restore only if nothing else changed the collection since this
    /// mutation's optimistic apply.
    #[default]
    Guarded,
    /// Always restore the snapshot, even over newer state.
    Unguarded,
}

impl std::str::FromStr for RollbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guarded" => Ok(RollbackPolicy::Guarded),
            "unguarded" => Ok(RollbackPolicy::Unguarded),
            other => Err(format!("unknown rollback policy: {}", other)),
        }
    }
}

/// What to do with the state holder when a mutation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackDecision {
    Restore,
    /// A newer write superseded the optimistic state; leave it in place.
    SkipStale,
}

/// Decides whether a rollback may overwrite the current state.
///
/// `applied_version` is the version produced by this mutation's optimistic
/// apply; `current_version` is what the holder reports now.
pub fn rollback_decision(
    policy: RollbackPolicy,
    applied_version: u64,
    current_version: u64,
) -> RollbackDecision {
    match policy {
        RollbackPolicy::Unguarded => RollbackDecision::Restore,
        RollbackPolicy::Guarded if applied_version == current_version => RollbackDecision::Restore,
        RollbackPolicy::Guarded => RollbackDecision::SkipStale,
    }
}
