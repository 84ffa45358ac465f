//! The mutation runtime: coordinator and per-kind status trackers.

mod coordinator;
mod tracker;

pub use coordinator::{MutationCoordinator, MutationOutcome};
pub use tracker::MutationTracker;
