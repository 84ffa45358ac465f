//! Capacity classification.
//!
//! Maps a room or section capacity onto a size category using fixed,
//! half-open thresholds. The mapping is total: any integer, including
//! negative values, yields a group.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ScheduleError;

/// Derived size category for a numeric capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CapacityGroup {
    XS,
    S,
    MS,
    M,
    L,
}

impl CapacityGroup {
    /// All groups from smallest to largest.
    pub const ALL: [CapacityGroup; 5] = [
        CapacityGroup::XS,
        CapacityGroup::S,
        CapacityGroup::MS,
        CapacityGroup::M,
        CapacityGroup::L,
    ];

    /// Inclusive lower bound, `None` for the open-ended smallest group.
    pub fn lower_bound(&self) -> Option<i32> {
        match self {
            CapacityGroup::XS => None,
            CapacityGroup::S => Some(30),
            CapacityGroup::MS => Some(40),
            CapacityGroup::M => Some(50),
            CapacityGroup::L => Some(60),
        }
    }

    /// Exclusive upper bound, `None` for the open-ended largest group.
    pub fn upper_bound(&self) -> Option<i32> {
        match self {
            CapacityGroup::XS => Some(30),
            CapacityGroup::S => Some(40),
            CapacityGroup::MS => Some(50),
            CapacityGroup::M => Some(60),
            CapacityGroup::L => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityGroup::XS => "XS",
            CapacityGroup::S => "S",
            CapacityGroup::MS => "MS",
            CapacityGroup::M => "M",
            CapacityGroup::L => "L",
        }
    }

    /// Returns true if `capacity` classifies into this group.
    pub fn contains(&self, capacity: i32) -> bool {
        classify(capacity) == *self
    }
}

impl fmt::Display for CapacityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapacityGroup {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CapacityGroup::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScheduleError::UnknownCapacityGroup(s.to_string()))
    }
}

/// Classifies a capacity into its size group.
///
/// # Examples
///
/// ```
/// use timetable_core::schedule::{classify, CapacityGroup};
///
/// assert_eq!(classify(29), CapacityGroup::XS);
/// assert_eq!(classify(30), CapacityGroup::S);
/// assert_eq!(classify(60), CapacityGroup::L);
/// assert_eq!(classify(-5), CapacityGroup::XS);
/// ```
pub fn classify(capacity: i32) -> CapacityGroup {
    match capacity {
        i32::MIN..=29 => CapacityGroup::XS,
        30..=39 => CapacityGroup::S,
        40..=49 => CapacityGroup::MS,
        50..=59 => CapacityGroup::M,
        _ => CapacityGroup::L,
    }
}

/// Returns true if a space of `capacity` can host a section sized `required`.
pub fn fits(capacity: i32, required: CapacityGroup) -> bool {
    classify(capacity) >= required
}
