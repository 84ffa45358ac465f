//! timetable_client - HTTP client for the timetable API.
//!
//! Implements the remote contracts of `timetable_core` over `reqwest`.

pub mod client;
pub mod error;

pub use client::{HttpCollection, TimetableClient};
pub use error::{ClientError, Result};
