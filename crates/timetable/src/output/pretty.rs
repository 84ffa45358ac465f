//! Pretty output formatting.

use timetable_core::mutation::{Notice, NoticeLevel};
use timetable_core::schedule::{
    CapacityGroup, Day, EntityKind, Module, Period, Professor, Section, SectionSession, Size,
    Space,
};

/// One-line description of a record.
pub trait Summary {
    fn summary(&self) -> String;
}

impl Summary for Day {
    fn summary(&self) -> String {
        format!("{} {} ({})", self.id, self.name, self.short_name)
    }
}

impl Summary for Module {
    fn summary(&self) -> String {
        match &self.difference {
            Some(difference) => format!("{} [{}]", self.label, difference),
            None => self.label.clone(),
        }
    }
}

impl Summary for Period {
    fn summary(&self) -> String {
        format!(
            "{} {} -> {} [{:?}]",
            self.label, self.start_date, self.end_date, self.status
        )
    }
}

impl Summary for Professor {
    fn summary(&self) -> String {
        match &self.email {
            Some(email) => format!("{} <{}>", self.label, email),
            None => self.label.clone(),
        }
    }
}

impl Summary for Space {
    fn summary(&self) -> String {
        let size = self.size.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        let mut output = format!("{} {:?} cap {} [{}]", self.id, self.kind, self.capacity, size);
        if let Some(building) = &self.building {
            output.push_str(&format!(" @ {}", building));
        }
        output
    }
}

impl Summary for Size {
    fn summary(&self) -> String {
        self.label.clone()
    }
}

impl Summary for Section {
    fn summary(&self) -> String {
        let professor = self
            .professor
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("unassigned");
        format!(
            "{} {}-{} {} ({} sessions, {})",
            self.id,
            self.subject.id,
            self.code,
            self.subject.name,
            self.session_counts.total(),
            professor
        )
    }
}

impl Summary for SectionSession {
    fn summary(&self) -> String {
        let slot = self
            .session
            .day_module_id
            .map(|id| format!("slot {}", id))
            .unwrap_or_else(|| "unscheduled".to_string());
        format!(
            "{} {:?} of {} {}-{} ({})",
            self.session.id, self.session.kind, self.section_id, self.subject.id, self.code, slot
        )
    }
}

/// Format a collection for display.
pub fn format_collection<T: Summary>(kind: EntityKind, items: &[T]) -> String {
    if items.is_empty() {
        return format!("No {} found.", kind);
    }
    let mut output = format!("{} ({})\n", kind.as_str().to_uppercase(), items.len());
    output.push_str(&"-".repeat(40));
    for item in items {
        output.push_str(&format!("\n  {}", item.summary()));
    }
    output
}

/// Format a mutation notice for display.
pub fn format_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Success => format!("ok: {}", notice.message),
        NoticeLevel::Error => format!("error: {}", notice.message),
    }
}

/// Format a capacity classification for display.
pub fn format_classification(capacity: i32, group: CapacityGroup) -> String {
    let range = match (group.lower_bound(), group.upper_bound()) {
        (Some(min), Some(max)) => format!("{}-{}", min, max - 1),
        (None, Some(max)) => format!("< {}", max),
        (Some(min), None) => format!(">= {}", min),
        (None, None) => "any".to_string(),
    };
    format!("{} -> {} ({})", capacity, group, range)
}
