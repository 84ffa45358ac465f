//! timetable - Imperative shell for the timetable project.
//!
//! Holds the cache media, the compressed collection store, cache-first
//! repositories and the optimistic mutation coordinator. Pure logic lives in
//! `timetable_core`; HTTP in `timetable_client`.

pub mod cache;
pub mod cli;
pub mod config;
pub mod mutation;
pub mod notify;
pub mod output;
pub mod repository;
pub mod services;
pub mod state;

pub use config::{CacheBackend, Config, ConfigError};
pub use mutation::{MutationCoordinator, MutationOutcome, MutationTracker};
pub use repository::{EntityRepository, FetchState};
pub use services::Services;
pub use state::{CollectionView, SharedCollection};
