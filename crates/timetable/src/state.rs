//! Caller-held collection state that mutations apply to.

use std::sync::Arc;

use tokio::sync::watch;

use timetable_core::mutation::MutationSnapshot;
use timetable_core::schedule::{reconcile, Entity};

/// A published collection and the version it was written at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionView<T> {
    pub version: u64,
    pub items: Vec<T>,
}

/// The state holder a UI renders from.
///
/// Every write bumps the version, which lets a failed mutation tell whether
/// someone else wrote after its optimistic apply. Writes are synchronous.
#[derive(Debug)]
pub struct SharedCollection<T> {
    tx: Arc<watch::Sender<CollectionView<T>>>,
}

impl<T> Clone for SharedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Entity> SharedCollection<T> {
    pub fn new(items: Vec<T>) -> Self {
        let (tx, _) = watch::channel(CollectionView { version: 0, items });
        Self { tx: Arc::new(tx) }
    }

    /// Returns an owned copy of the current items.
    pub fn items(&self) -> Vec<T> {
        self.tx.borrow().items.clone()
    }

    pub fn version(&self) -> u64 {
        self.tx.borrow().version
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().items.is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionView<T>> {
        self.tx.subscribe()
    }

    /// Takes an owned copy of the current state.
    pub fn snapshot(&self) -> MutationSnapshot<T> {
        let view = self.tx.borrow();
        MutationSnapshot::new(view.items.clone(), view.version)
    }

    /// Publishes `items` and returns the new version.
    pub fn replace(&self, items: Vec<T>) -> u64 {
        let mut version = 0;
        self.tx.send_modify(|view| {
            view.version += 1;
            view.items = items;
            version = view.version;
        });
        version
    }

    /// Lays server-confirmed items over the current state and returns the
    /// new version.
    pub fn reconcile(&self, confirmed: Vec<T>) -> u64 {
        let mut version = 0;
        self.tx.send_modify(|view| {
            view.version += 1;
            view.items = reconcile(&view.items, confirmed);
            version = view.version;
        });
        version
    }

    /// Restores a snapshot verbatim.
    pub fn restore(&self, snapshot: MutationSnapshot<T>) -> u64 {
        self.replace(snapshot.into_items())
    }
}

impl<T: Entity> Default for SharedCollection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use timetable_core::schedule::Day;

    use super::*;

    fn day(id: i64) -> Day {
        Day {
            id,
            name: format!("Day {}", id),
            short_name: String::new(),
            medium_name: String::new(),
        }
    }

    #[test]
    fn test_replace_bumps_version() {
        let state = SharedCollection::new(vec![day(1)]);
        assert_eq!(state.version(), 0);

        let version = state.replace(vec![day(1), day(2)]);

        assert_eq!(version, 1);
        assert_eq!(state.version(), 1);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let state = SharedCollection::new(vec![day(1), day(2)]);
        let snapshot = state.snapshot();

        state.replace(vec![]);

        assert_eq!(snapshot.items(), &[day(1), day(2)]);
        assert_eq!(snapshot.version(), 0);
        assert!(state.is_empty());
    }

    #[test]
    fn test_restore() {
        let state = SharedCollection::new(vec![day(1), day(2)]);
        let snapshot = state.snapshot();
        state.replace(vec![day(2)]);

        state.restore(snapshot);

        assert_eq!(state.items(), vec![day(1), day(2)]);
        assert_eq!(state.version(), 2);
    }

    #[test]
    fn test_reconcile_overlays_confirmed() {
        let state = SharedCollection::new(vec![day(1), day(2)]);
        let mut renamed = day(2);
        renamed.name = "Tuesday".to_string();

        state.reconcile(vec![renamed.clone(), day(3)]);

        assert_eq!(state.items(), vec![day(1), renamed, day(3)]);
    }

    #[tokio::test]
    async fn test_subscribers_see_writes() {
        let state = SharedCollection::new(vec![day(1)]);
        let mut rx = state.subscribe();

        state.replace(vec![day(4)]);

        rx.changed().await.unwrap();
        let view = rx.borrow_and_update().clone();
        assert_eq!(view.items, vec![day(4)]);
        assert_eq!(view.version, 1);
    }

    #[test]
    fn test_clones_share_state() {
        let state = SharedCollection::new(vec![day(1)]);
        let other = state.clone();

        other.replace(vec![]);

        assert!(state.is_empty());
    }
}
