//! Pure collection operations used to compute optimistic states.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::dedupe::dedupe_by;
use super::entity::Entity;
use super::error::ScheduleError;
use super::types::{DayModule, SectionSession};

/// One entry of a batch time update: move `session_id` to `day_module_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotChange {
    pub session_id: String,
    pub day_module_id: i64,
}

impl SlotChange {
    pub fn new(session_id: impl Into<String>, day_module_id: i64) -> Self {
        Self {
            session_id: session_id.into(),
            day_module_id,
        }
    }
}

/// Removes every element whose identity is in `ids`, duplicates included.
pub fn remove_by_ids<T: Entity>(items: &[T], ids: &[T::Id]) -> Vec<T> {
    let targets: HashSet<&T::Id> = ids.iter().collect();
    items
        .iter()
        .filter(|item| !targets.contains(&item.id()))
        .cloned()
        .collect()
}

/// Replaces the first element matching `id_equals`, or appends `item`.
pub fn upsert_by<T, F>(mut items: Vec<T>, item: T, id_equals: F) -> Vec<T>
where
    F: Fn(&T, &T) -> bool,
{
    let position = items.iter().position(|existing| id_equals(existing, &item));
    match position {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
    items
}

/// Removes the first element matching `predicate`. Returns the remainder and
/// whether anything was removed.
pub fn remove_first<T, F>(mut items: Vec<T>, predicate: F) -> (Vec<T>, bool)
where
    F: Fn(&T) -> bool,
{
    let position = items.iter().position(predicate);
    match position {
        Some(index) => {
            items.remove(index);
            (items, true)
        }
        None => (items, false),
    }
}

/// Lays server-confirmed items over the current collection.
///
/// The first occurrence of each confirmed id is replaced in place, later
/// duplicates of that id are dropped, and confirmed items unknown to the
/// current collection are appended in server order.
pub fn reconcile<T: Entity>(current: &[T], confirmed: Vec<T>) -> Vec<T> {
    let confirmed = dedupe_by(confirmed, T::id);
    let mut pending: HashMap<T::Id, T> =
        confirmed.iter().map(|item| (item.id(), item.clone())).collect();
    let mut replaced: HashSet<T::Id> = HashSet::new();
    let mut result = Vec::with_capacity(current.len());

    for item in current {
        let id = item.id();
        if replaced.contains(&id) {
            continue;
        }
        match pending.remove(&id) {
            Some(fresh) => {
                replaced.insert(id);
                result.push(fresh);
            }
            None => result.push(item.clone()),
        }
    }

    result.extend(
        confirmed
            .into_iter()
            .filter(|item| pending.contains_key(&item.id())),
    );
    result
}

/// Checks a batch of moves for `section_id` against the held sessions.
///
/// Duplicate targets collapse to their first occurrence. Fails on an empty
/// batch, on unknown sessions, and on sessions owned by another section.
pub fn validate_slot_changes(
    section_id: &str,
    sessions: &[SectionSession],
    changes: &[SlotChange],
) -> Result<Vec<SlotChange>, ScheduleError> {
    let changes = dedupe_by(changes.iter().cloned(), |c| c.session_id.clone());
    if changes.is_empty() {
        return Err(ScheduleError::EmptyBatch);
    }

    for change in &changes {
        let owner = sessions
            .iter()
            .find(|s| s.session.id == change.session_id)
            .ok_or_else(|| ScheduleError::UnknownSession(change.session_id.clone()))?;
        if owner.section_id != section_id {
            return Err(ScheduleError::ForeignSession {
                session_id: change.session_id.clone(),
                section_id: section_id.to_string(),
            });
        }
        if change.day_module_id <= 0 {
            return Err(ScheduleError::InvalidMove(format!(
                "day module {} for session {}",
                change.day_module_id, change.session_id
            )));
        }
    }

    Ok(changes)
}

/// Applies slot changes to every object of each targeted session.
///
/// `day_modules` resolves the day/module pair for the new slot; an
/// unresolvable slot keeps only the `day_module_id`.
pub fn apply_slot_changes(
    sessions: &[SectionSession],
    changes: &[SlotChange],
    day_modules: &[DayModule],
) -> Vec<SectionSession> {
    let by_session: HashMap<&str, i64> = changes
        .iter()
        .map(|c| (c.session_id.as_str(), c.day_module_id))
        .collect();
    let slots: HashMap<i64, &DayModule> = day_modules.iter().map(|dm| (dm.id, dm)).collect();

    sessions
        .iter()
        .map(|s| match by_session.get(s.session.id.as_str()) {
            Some(&day_module_id) => {
                let mut moved = s.clone();
                let slot = slots.get(&day_module_id);
                moved.session.day_module_id = Some(day_module_id);
                moved.session.day_id = slot.map(|dm| dm.day_id);
                moved.session.module_id = slot.map(|dm| dm.module_id);
                moved
            }
            None => s.clone(),
        })
        .collect()
}
