//! timetable_core - Functional core for the timetable project.
//!
//! Everything in this crate is either a pure function or a trait describing
//! an effectful collaborator. Concrete stores, HTTP transports and the
//! mutation runtime live in the `timetable` and `timetable_client` crates.

pub mod cache;
pub mod mutation;
pub mod remote;
pub mod schedule;
pub mod serde;
