//! Batch target deduplication.

use std::collections::HashSet;
use std::hash::Hash;

/// Keeps only the first occurrence of each identity, preserving order.
///
/// # Examples
///
/// ```
/// use timetable_core::schedule::dedupe_by;
///
/// let items = vec![("a", 1), ("a", 2), ("b", 3)];
/// let unique = dedupe_by(items, |(key, _)| *key);
/// assert_eq!(unique, vec![("a", 1), ("b", 3)]);
/// ```
pub fn dedupe_by<T, K, F>(items: impl IntoIterator<Item = T>, identity: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(identity(item)))
        .collect()
}

/// Deduplicates a plain identifier list, preserving first-seen order.
pub fn dedupe_ids<K>(ids: impl IntoIterator<Item = K>) -> Vec<K>
where
    K: Eq + Hash + Clone,
{
    dedupe_by(ids, K::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Target {
        id: String,
        label: &'static str,
    }

    fn target(id: &str, label: &'static str) -> Target {
        Target {
            id: id.to_string(),
            label,
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let a = target("1", "first");
        let a_dup = target("1", "second");
        let b = target("2", "other");

        let unique = dedupe_by(vec![a.clone(), a_dup, b.clone()], |t| t.id.clone());

        assert_eq!(unique, vec![a, b]);
    }

    #[test]
    fn test_order_preserved() {
        let ids = vec!["c", "a", "c", "b", "a"];
        assert_eq!(dedupe_ids(ids), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<String> = vec![];
        assert!(dedupe_ids(empty).is_empty());
    }

    #[test]
    fn test_no_duplicates_is_identity() {
        let ids = vec![3, 1, 2];
        assert_eq!(dedupe_ids(ids.clone()), ids);
    }
}
