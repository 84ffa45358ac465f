use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ScheduleError;

/// The kinds of schedule collections held client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Days,
    Modules,
    Sections,
    Sessions,
    Spaces,
    Professors,
    Periods,
    Sizes,
}

impl EntityKind {
    /// Every kind, in the order the CLI lists them.
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Days,
        EntityKind::Modules,
        EntityKind::Sections,
        EntityKind::Sessions,
        EntityKind::Spaces,
        EntityKind::Professors,
        EntityKind::Periods,
        EntityKind::Sizes,
    ];

    /// Returns the lowercase name used in logs and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Days => "days",
            EntityKind::Modules => "modules",
            EntityKind::Sections => "sections",
            EntityKind::Sessions => "sessions",
            EntityKind::Spaces => "spaces",
            EntityKind::Professors => "professors",
            EntityKind::Periods => "periods",
            EntityKind::Sizes => "sizes",
        }
    }

    /// Returns the collection endpoint path, relative to the API base URL.
    pub fn endpoint(&self) -> String {
        format!("/{}", self.as_str())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScheduleError::UnknownKind(s.to_string()))
    }
}

/// A record belonging to one schedule collection.
///
/// Identity is stable and unique within a collection. `with_derived_fields`
/// is applied exactly once to freshly fetched items, before they are cached.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static;

    const KIND: EntityKind;

    fn id(&self) -> Self::Id;

    /// Computes display-only attributes from the record's own fields.
    fn with_derived_fields(self) -> Self {
        self
    }
}
