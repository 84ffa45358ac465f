mod capacity;
mod dedupe;
mod entity;
mod error;
mod operations;
mod types;

pub use capacity::{classify, fits, CapacityGroup};
pub use dedupe::{dedupe_by, dedupe_ids};
pub use entity::{Entity, EntityKind};
pub use error::ScheduleError;
pub use operations::{
    apply_slot_changes, reconcile, remove_by_ids, remove_first, upsert_by, validate_slot_changes,
    SlotChange,
};
pub use types::{
    Day, DayModule, Module, Period, PeriodRef, PeriodStatus, Professor, ProfessorRef, Section,
    SectionSession, SessionCounts, SessionKind, SessionRef, Size, Space, SpaceKind, SpaceRef,
    SubjectRef,
};
