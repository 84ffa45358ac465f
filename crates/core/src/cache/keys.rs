use crate::schedule::EntityKind;

/// Returns the fixed cache key for a collection, or `None` for kinds that
/// are never cached locally.
///
/// Modules are stored under `moduleOriginals`: the cached copy is the list
/// as served, before any grid-specific reshaping.
///
/// # Examples
///
/// ```
/// use timetable_core::cache::collection_key;
/// use timetable_core::schedule::EntityKind;
///
/// assert_eq!(collection_key(EntityKind::Days), Some("days"));
/// assert_eq!(collection_key(EntityKind::Modules), Some("moduleOriginals"));
/// assert_eq!(collection_key(EntityKind::Sessions), None);
/// ```
pub fn collection_key(kind: EntityKind) -> Option<&'static str> {
    match kind {
        EntityKind::Days => Some("days"),
        EntityKind::Modules => Some("moduleOriginals"),
        EntityKind::Sections => Some("sections"),
        EntityKind::Spaces => Some("spaces"),
        EntityKind::Professors => Some("professors"),
        EntityKind::Periods => Some("periods"),
        EntityKind::Sizes => Some("sizes"),
        EntityKind::Sessions => None,
    }
}

/// Prefixes a key with a namespace, if one is configured.
pub fn namespaced_key(namespace: Option<&str>, key: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{}:{}", ns, key),
        _ => key.to_string(),
    }
}

/// Returns every cacheable collection key.
pub fn all_collection_keys() -> Vec<&'static str> {
    EntityKind::ALL
        .into_iter()
        .filter_map(collection_key)
        .collect()
}

/// Returns true if a key is safe to use as a file name.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-'))
}
