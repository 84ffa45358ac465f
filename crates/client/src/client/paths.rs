use std::fmt::Display;

use timetable_core::schedule::EntityKind;

/// `<endpoint>/<id>`
pub fn item_path(kind: EntityKind, id: impl Display) -> String {
    format!("{}/{}", kind.endpoint(), id)
}

/// `<endpoint>/massive/<id,id,...>`
///
/// # Examples
///
/// ```
/// use timetable_client::client::massive_path;
/// use timetable_core::schedule::EntityKind;
///
/// assert_eq!(massive_path(EntityKind::Sessions, &["a", "b"]), "/sessions/massive/a,b");
/// ```
pub fn massive_path<I: Display>(kind: EntityKind, ids: &[I]) -> String {
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("{}/massive/{}", kind.endpoint(), joined)
}

/// `<endpoint>/update-times/<owner_id>`
pub fn update_times_path(kind: EntityKind, owner_id: &str) -> String {
    format!("{}/update-times/{}", kind.endpoint(), owner_id)
}
