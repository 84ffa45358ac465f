use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::capacity::{classify, CapacityGroup};
use super::entity::{Entity, EntityKind};
use crate::serde::{deserialize_flexible_id, deserialize_optional_string};

/// A weekday that can host teaching modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub medium_name: String,
}

impl Entity for Day {
    type Id = i64;
    const KIND: EntityKind = EntityKind::Days;

    fn id(&self) -> i64 {
        self.id
    }
}

/// A teaching block within a day (e.g. "M1 08:30-09:50").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: i64,
    pub code: String,
    pub start_hour: String,
    pub end_hour: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub difference: Option<String>,
    /// Derived display label.
    #[serde(default)]
    pub label: String,
}

impl Entity for Module {
    type Id = i64;
    const KIND: EntityKind = EntityKind::Modules;

    fn id(&self) -> i64 {
        self.id
    }

    fn with_derived_fields(mut self) -> Self {
        self.label = format!("M{} {}-{}", self.code, self.start_hour, self.end_hour);
        self
    }
}

/// A (day, module) pair; the unit of placement on the timetable grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayModule {
    pub id: i64,
    pub day_id: i64,
    pub module_id: i64,
}

/// Lifecycle of an academic period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PeriodStatus {
    Opened,
    InProgress,
    Closed,
}

/// An academic term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PeriodStatus,
    /// Derived display label.
    #[serde(default)]
    pub label: String,
}

impl Entity for Period {
    type Id = i64;
    const KIND: EntityKind = EntityKind::Periods;

    fn id(&self) -> i64 {
        self.id
    }

    fn with_derived_fields(mut self) -> Self {
        self.label = format!("{}-{}", self.id, self.name);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Professor {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    /// Derived display label.
    #[serde(default)]
    pub label: String,
}

impl Entity for Professor {
    type Id = String;
    const KIND: EntityKind = EntityKind::Professors;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn with_derived_fields(mut self) -> Self {
        self.label = format!("{}-{}", self.id, self.name);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpaceKind {
    Room,
    Lab,
    Auditorium,
    Workshop,
    Corridor,
    Dis,
    Garden,
}

/// A physical room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SpaceKind,
    pub capacity: i32,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub building: Option<String>,
    /// Derived from `capacity`.
    #[serde(default)]
    pub size: Option<CapacityGroup>,
}

impl Entity for Space {
    type Id = String;
    const KIND: EntityKind = EntityKind::Spaces;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn with_derived_fields(mut self) -> Self {
        self.size = Some(classify(self.capacity));
        self
    }
}

/// A size category as published by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub id: CapacityGroup,
    pub detail: String,
    #[serde(default)]
    pub min: Option<i32>,
    #[serde(default)]
    pub max: Option<i32>,
    /// Derived display label.
    #[serde(default)]
    pub label: String,
}

impl Entity for Size {
    type Id = CapacityGroup;
    const KIND: EntityKind = EntityKind::Sizes;

    fn id(&self) -> CapacityGroup {
        self.id
    }

    fn with_derived_fields(mut self) -> Self {
        self.label = format!("{} ({})", self.id, self.detail);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRef {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorRef {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceRef {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub id: String,
    #[serde(default)]
    pub capacity: Option<i32>,
}

/// How many sessions of each kind a section must schedule per week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounts {
    #[serde(default)]
    pub lecture: u32,
    #[serde(default)]
    pub tutoring: u32,
    #[serde(default)]
    pub workshop: u32,
    #[serde(default)]
    pub laboratory: u32,
}

impl SessionCounts {
    pub fn total(&self) -> u32 {
        self.lecture + self.tutoring + self.workshop + self.laboratory
    }
}

/// A class offering of a subject in a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub id: String,
    pub code: i32,
    pub subject: SubjectRef,
    pub period: PeriodRef,
    #[serde(default)]
    pub professor: Option<ProfessorRef>,
    #[serde(default)]
    pub space: Option<SpaceRef>,
    #[serde(default)]
    pub size: Option<CapacityGroup>,
    #[serde(default)]
    pub session_counts: SessionCounts,
}

impl Entity for Section {
    type Id = String;
    const KIND: EntityKind = EntityKind::Sections;

    fn id(&self) -> String {
        self.id.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SessionKind {
    Lecture,
    Tutoring,
    Workshop,
    Laboratory,
}

/// Identity and placement of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRef {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub id: String,
    #[serde(rename = "name")]
    pub kind: SessionKind,
    #[serde(default)]
    pub day_module_id: Option<i64>,
    #[serde(default)]
    pub day_id: Option<i64>,
    #[serde(default)]
    pub module_id: Option<i64>,
}

/// A scheduled occurrence of a section, denormalized for the grid.
///
/// Identity is `session.id`. The client may transiently hold several
/// objects sharing one session id after optimistic merges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSession {
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub section_id: String,
    pub code: i32,
    pub subject: SubjectRef,
    #[serde(default)]
    pub professor: Option<ProfessorRef>,
    #[serde(default)]
    pub space: Option<SpaceRef>,
    pub session: SessionRef,
}

impl SectionSession {
    /// Returns true if the session is currently placed on the grid.
    pub fn is_scheduled(&self) -> bool {
        self.session.day_module_id.is_some()
    }
}

impl Entity for SectionSession {
    type Id = String;
    const KIND: EntityKind = EntityKind::Sessions;

    fn id(&self) -> String {
        self.session.id.clone()
    }
}
