//! Optimistic apply, remote call, then commit or rollback.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use timetable_core::mutation::{
    rollback_decision, MutationError, MutationKind, MutationPhase, Notice, RollbackDecision,
    RollbackPolicy,
};
use timetable_core::remote::{self, RemoteCollection, RemoteError, SessionRemote};
use timetable_core::schedule::{
    apply_slot_changes, dedupe_ids, remove_by_ids, validate_slot_changes, DayModule, Entity,
    ScheduleError, SectionSession, SlotChange,
};

use super::MutationTracker;
use crate::cache::Invalidate;
use crate::notify::Notifier;
use crate::state::SharedCollection;

/// How a mutation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Committed,
    /// The remote call failed and the snapshot was restored.
    RolledBack(RemoteError),
    /// The remote call failed after a newer write. Nothing was restored, so
    /// the collection may still show this mutation and should be refetched.
    Superseded(RemoteError),
}

impl MutationOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, MutationOutcome::Committed)
    }

    pub fn error(&self) -> Option<&RemoteError> {
        match self {
            MutationOutcome::Committed => None,
            MutationOutcome::RolledBack(err) | MutationOutcome::Superseded(err) => Some(err),
        }
    }
}

/// Runs mutations against caller-held collections.
///
/// Every mutation snapshots the collection, applies the next state before
/// any remote call is issued, then commits or rolls back. One notice is
/// emitted per mutation. Nothing is retried.
pub struct MutationCoordinator {
    sessions: Arc<dyn SessionRemote>,
    notifier: Arc<dyn Notifier>,
    policy: RollbackPolicy,
    dependents: Vec<Arc<dyn Invalidate>>,
    trackers: Mutex<HashMap<MutationKind, MutationTracker>>,
}

impl MutationCoordinator {
    pub fn new(sessions: Arc<dyn SessionRemote>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            sessions,
            notifier,
            policy: RollbackPolicy::default(),
            dependents: Vec::new(),
            trackers: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_policy(mut self, policy: RollbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Registers a cache to invalidate whenever a mutation commits.
    pub fn with_dependent(mut self, dependent: Arc<dyn Invalidate>) -> Self {
        self.dependents.push(dependent);
        self
    }

    pub fn policy(&self) -> RollbackPolicy {
        self.policy
    }

    /// Returns the status tracker for a mutation kind.
    pub fn tracker(&self, kind: MutationKind) -> MutationTracker {
        let mut trackers = self.trackers.lock().unwrap_or_else(PoisonError::into_inner);
        trackers.entry(kind).or_default().clone()
    }

    /// Runs one mutation.
    ///
    /// `next` is published to `state` before `remote_call` is invoked. If
    /// the call returns items, they are reconciled onto the state by id.
    pub async fn run<T, F, Fut>(
        &self,
        kind: MutationKind,
        state: &SharedCollection<T>,
        next: Vec<T>,
        remote_call: F,
    ) -> MutationOutcome
    where
        T: Entity,
        F: FnOnce() -> Fut,
        Fut: Future<Output = remote::Result<Option<Vec<T>>>>,
    {
        let mutation_id = Uuid::new_v4();
        let mut attempt = self.tracker(kind).begin();

        let snapshot = state.snapshot();
        attempt.advance(MutationPhase::SnapshotTaken);

        let applied_version = state.replace(next);
        attempt.advance(MutationPhase::OptimisticApplied);
        tracing::debug!(
            %mutation_id,
            %kind,
            version = applied_version,
            items = state.len(),
            "Optimistic state applied"
        );

        attempt.advance(MutationPhase::RemotePending);
        match remote_call().await {
            Ok(confirmed) => {
                if let Some(confirmed) = confirmed {
                    state.reconcile(confirmed);
                }
                self.invalidate_dependents().await;
                attempt.advance(MutationPhase::Committed);
                tracing::info!(%mutation_id, %kind, "Mutation committed");
                self.notifier.notify(Notice::success(kind));
                MutationOutcome::Committed
            }
            Err(err) => {
                let current_version = state.version();
                let decision = rollback_decision(self.policy, applied_version, current_version);
                let restored = match decision {
                    RollbackDecision::Restore => {
                        state.restore(snapshot);
                        tracing::info!(%mutation_id, %kind, error = %err, "Mutation rolled back");
                        true
                    }
                    RollbackDecision::SkipStale => {
                        tracing::warn!(
                            %mutation_id,
                            %kind,
                            error = %err,
                            applied_version,
                            current_version,
                            "Mutation failed after a newer write, keeping current state"
                        );
                        self.invalidate_dependents().await;
                        false
                    }
                };
                attempt.advance(MutationPhase::RolledBack);
                self.notifier.notify(Notice::failure(kind, &err));
                if restored {
                    MutationOutcome::RolledBack(err)
                } else {
                    MutationOutcome::Superseded(err)
                }
            }
        }
    }

    /// Deletes one session.
    pub async fn delete_session(
        &self,
        sessions: &SharedCollection<SectionSession>,
        session_id: &str,
    ) -> MutationOutcome {
        let id = session_id.to_string();
        let next = remove_by_ids(&sessions.items(), std::slice::from_ref(&id));
        let remote = Arc::clone(&self.sessions);

        self.run(MutationKind::DeleteSession, sessions, next, move || async move {
            remote.delete(&id).await.map(|_| None)
        })
        .await
    }

    /// Deletes several sessions with one remote call. Duplicate ids collapse
    /// before anything is applied.
    pub async fn delete_sessions(
        &self,
        sessions: &SharedCollection<SectionSession>,
        session_ids: &[String],
    ) -> Result<MutationOutcome, MutationError> {
        let ids = dedupe_ids(session_ids.iter().cloned());
        if ids.is_empty() {
            return Err(ScheduleError::EmptyBatch.into());
        }

        let next = remove_by_ids(&sessions.items(), &ids);
        let remote = Arc::clone(&self.sessions);

        Ok(self
            .run(MutationKind::DeleteSessions, sessions, next, move || async move {
                remote.delete_many(&ids).await.map(|_| None)
            })
            .await)
    }

    /// Moves sessions of one section to new day/module slots.
    ///
    /// `day_modules` resolves the day and module of each target slot in the
    /// optimistic state; the server's answer replaces it on commit.
    pub async fn update_session_times(
        &self,
        sessions: &SharedCollection<SectionSession>,
        section_id: &str,
        changes: &[SlotChange],
        day_modules: &[DayModule],
    ) -> Result<MutationOutcome, MutationError> {
        let current = sessions.items();
        let changes = validate_slot_changes(section_id, &current, changes)?;
        let next = apply_slot_changes(&current, &changes, day_modules);
        let remote = Arc::clone(&self.sessions);
        let section_id = section_id.to_string();

        Ok(self
            .run(
                MutationKind::UpdateSessionTimes,
                sessions,
                next,
                move || async move { remote.update_times(&section_id, &changes).await.map(Some) },
            )
            .await)
    }

    async fn invalidate_dependents(&self) {
        for dependent in &self.dependents {
            tracing::trace!(cache = dependent.name(), "Invalidating dependent cache");
            dependent.invalidate().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use timetable_core::cache::{KeyValueStore, ZstdCodec};
    use timetable_core::remote::FailureClass;
    use timetable_core::schedule::{
        PeriodRef, Section, SessionCounts, SessionKind, SessionRef, SubjectRef,
    };
    use tokio::sync::mpsc::error::TryRecvError;
    use tokio::sync::{Mutex as AsyncMutex, Notify};

    use super::*;
    use crate::cache::{CompressedCacheStore, MemoryStore};
    use crate::notify::ChannelNotifier;

    #[derive(Default)]
    struct MockSessions {
        /// Ids whose deletion fails with a 409.
        failing: HashSet<String>,
        /// Deleting this id waits for `gate`.
        gated: Option<String>,
        gate: Notify,
        fail_updates: bool,
        /// The state the coordinator writes to, to observe it mid-call.
        observed: Option<SharedCollection<SectionSession>>,
        seen_during_call: AsyncMutex<Vec<Vec<String>>>,
        delete_calls: AtomicUsize,
        delete_many_calls: AsyncMutex<Vec<Vec<String>>>,
        update_calls: AsyncMutex<Vec<(String, Vec<SlotChange>)>>,
    }

    impl MockSessions {
        async fn observe(&self) {
            if let Some(state) = &self.observed {
                self.seen_during_call.lock().await.push(ids(&state.items()));
            }
        }
    }

    #[async_trait]
    impl RemoteCollection<SectionSession> for MockSessions {
        async fn list(&self) -> remote::Result<Vec<SectionSession>> {
            Ok(Vec::new())
        }

        async fn delete(&self, id: &String) -> remote::Result<()> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            self.observe().await;
            if self.gated.as_ref() == Some(id) {
                self.gate.notified().await;
            }
            if self.failing.contains(id) {
                return Err(RemoteError::Http {
                    status: 409,
                    message: Some("Session is locked".to_string()),
                });
            }
            Ok(())
        }

        async fn delete_many(&self, ids: &[String]) -> remote::Result<()> {
            self.observe().await;
            self.delete_many_calls.lock().await.push(ids.to_vec());
            Ok(())
        }
    }

    #[async_trait]
    impl SessionRemote for MockSessions {
        async fn update_times(
            &self,
            section_id: &str,
            changes: &[SlotChange],
        ) -> remote::Result<Vec<SectionSession>> {
            self.observe().await;
            self.update_calls
                .lock()
                .await
                .push((section_id.to_string(), changes.to_vec()));
            if self.fail_updates {
                return Err(RemoteError::Network("connection reset".to_string()));
            }
            Ok(changes
                .iter()
                .map(|c| {
                    let mut confirmed = session(section_id, &c.session_id);
                    confirmed.session.day_module_id = Some(c.day_module_id);
                    confirmed.session.day_id = Some(1);
                    confirmed.session.module_id = Some(1);
                    confirmed
                })
                .collect())
        }
    }

    fn session(section_id: &str, session_id: &str) -> SectionSession {
        SectionSession {
            section_id: section_id.to_string(),
            code: 1,
            subject: SubjectRef {
                id: "MAT-101".to_string(),
                name: "Calculus".to_string(),
            },
            professor: None,
            space: None,
            session: SessionRef {
                id: session_id.to_string(),
                kind: SessionKind::Lecture,
                day_module_id: None,
                day_id: None,
                module_id: None,
            },
        }
    }

    fn ids(sessions: &[SectionSession]) -> Vec<String> {
        sessions.iter().map(|s| s.session.id.clone()).collect()
    }

    fn three_sessions() -> SharedCollection<SectionSession> {
        SharedCollection::new(vec![
            session("sec", "s1"),
            session("sec", "s2"),
            session("sec", "s3"),
        ])
    }

    fn coordinator(
        remote: Arc<MockSessions>,
    ) -> (
        MutationCoordinator,
        tokio::sync::mpsc::UnboundedReceiver<Notice>,
    ) {
        let (notifier, rx) = ChannelNotifier::new();
        (MutationCoordinator::new(remote, Arc::new(notifier)), rx)
    }

    #[tokio::test]
    async fn test_rollback_restores_snapshot_and_notifies_once() {
        let state = three_sessions();
        let remote = Arc::new(MockSessions {
            failing: HashSet::from(["s2".to_string()]),
            observed: Some(state.clone()),
            ..Default::default()
        });
        let (coordinator, mut rx) = coordinator(remote.clone());

        let outcome = coordinator.delete_session(&state, "s2").await;

        assert_eq!(
            *remote.seen_during_call.lock().await,
            vec![vec!["s1".to_string(), "s3".to_string()]]
        );
        assert!(matches!(outcome, MutationOutcome::RolledBack(_)));
        assert_eq!(ids(&state.items()), vec!["s1", "s2", "s3"]);

        let notice = rx.recv().await.unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.class, Some(FailureClass::Conflict));
        assert_eq!(notice.message, "Session is locked");
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
        assert!(coordinator.tracker(MutationKind::DeleteSession).is_error());
    }

    #[tokio::test]
    async fn test_delete_commit_keeps_optimistic_state() {
        let state = three_sessions();
        let remote = Arc::new(MockSessions::default());
        let (coordinator, mut rx) = coordinator(remote.clone());

        let outcome = coordinator.delete_session(&state, "s1").await;

        assert!(outcome.is_committed());
        assert_eq!(ids(&state.items()), vec!["s2", "s3"]);
        assert_eq!(rx.recv().await.unwrap().message, "Session deleted");
        assert!(coordinator.tracker(MutationKind::DeleteSession).is_success());
    }

    #[tokio::test]
    async fn test_batch_delete_dedupes_into_one_call() {
        let state = three_sessions();
        let remote = Arc::new(MockSessions::default());
        let (coordinator, _rx) = coordinator(remote.clone());

        let outcome = coordinator
            .delete_sessions(
                &state,
                &["s1".to_string(), "s1".to_string(), "s2".to_string()],
            )
            .await
            .unwrap();

        assert!(outcome.is_committed());
        assert_eq!(
            *remote.delete_many_calls.lock().await,
            vec![vec!["s1".to_string(), "s2".to_string()]]
        );
        assert_eq!(remote.delete_calls.load(Ordering::SeqCst), 0);
        assert_eq!(ids(&state.items()), vec!["s3"]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected_before_apply() {
        let state = three_sessions();
        let remote = Arc::new(MockSessions::default());
        let (coordinator, mut rx) = coordinator(remote.clone());

        let result = coordinator.delete_sessions(&state, &[]).await;

        assert_eq!(
            result,
            Err(MutationError::Validation(ScheduleError::EmptyBatch))
        );
        assert_eq!(state.version(), 0);
        assert!(remote.delete_many_calls.lock().await.is_empty());
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[tokio::test]
    async fn test_update_times_reconciles_server_answer() {
        let state = three_sessions();
        let remote = Arc::new(MockSessions {
            observed: Some(state.clone()),
            ..Default::default()
        });
        let (coordinator, mut rx) = coordinator(remote.clone());
        let slots = [DayModule {
            id: 12,
            day_id: 3,
            module_id: 4,
        }];

        let outcome = coordinator
            .update_session_times(
                &state,
                "sec",
                &[SlotChange::new("s2", 12), SlotChange::new("s2", 99)],
                &slots,
            )
            .await
            .unwrap();

        assert!(outcome.is_committed());
        let calls = remote.update_calls.lock().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, vec![SlotChange::new("s2", 12)]);

        let items = state.items();
        assert_eq!(ids(&items), vec!["s1", "s2", "s3"]);
        assert_eq!(items[1].session.day_module_id, Some(12));
        assert_eq!(items[1].session.day_id, Some(1));
        assert_eq!(rx.recv().await.unwrap().message, "Sessions updated");
    }

    #[tokio::test]
    async fn test_update_times_rollback_on_network_failure() {
        let state = three_sessions();
        let remote = Arc::new(MockSessions {
            fail_updates: true,
            ..Default::default()
        });
        let (coordinator, mut rx) = coordinator(remote);
        let before = state.items();

        let outcome = coordinator
            .update_session_times(&state, "sec", &[SlotChange::new("s1", 5)], &[])
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            MutationOutcome::RolledBack(RemoteError::Network(_))
        ));
        assert_eq!(state.items(), before);
        assert_eq!(
            rx.recv().await.unwrap().class,
            Some(FailureClass::Network)
        );
    }

    #[tokio::test]
    async fn test_update_times_foreign_session_rejected() {
        let state = three_sessions();
        let remote = Arc::new(MockSessions::default());
        let (coordinator, _rx) = coordinator(remote.clone());

        let result = coordinator
            .update_session_times(&state, "other", &[SlotChange::new("s1", 5)], &[])
            .await;

        assert!(matches!(
            result,
            Err(MutationError::Validation(ScheduleError::ForeignSession { .. }))
        ));
        assert!(remote.update_calls.lock().await.is_empty());
    }

    fn section() -> Section {
        Section {
            id: "sec".to_string(),
            code: 1,
            subject: SubjectRef {
                id: "MAT-101".to_string(),
                name: "Calculus".to_string(),
            },
            period: PeriodRef {
                id: 1,
                name: "2026-1".to_string(),
            },
            professor: None,
            space: None,
            size: None,
            session_counts: SessionCounts::default(),
        }
    }

    #[tokio::test]
    async fn test_commit_invalidates_dependent_cache() {
        let medium: Arc<dyn KeyValueStore> =
            Arc::new(MemoryStore::new(std::num::NonZeroUsize::new(8).unwrap()));
        let sections: CompressedCacheStore<Section> =
            CompressedCacheStore::for_entity(medium.clone(), Arc::new(ZstdCodec::default()), None)
                .unwrap();
        sections.save(&[section()]).await;

        let state = three_sessions();
        let (notifier, _rx) = ChannelNotifier::new();
        let coordinator =
            MutationCoordinator::new(Arc::new(MockSessions::default()), Arc::new(notifier))
                .with_dependent(Arc::new(sections.clone()));

        coordinator.delete_session(&state, "s1").await;

        assert!(medium.get("sections").await.unwrap().is_none());
        assert!(sections.get().await.is_empty());
    }

    #[tokio::test]
    async fn test_rollback_keeps_dependent_cache() {
        let medium: Arc<dyn KeyValueStore> =
            Arc::new(MemoryStore::new(std::num::NonZeroUsize::new(8).unwrap()));
        let sections: CompressedCacheStore<Section> =
            CompressedCacheStore::for_entity(medium.clone(), Arc::new(ZstdCodec::default()), None)
                .unwrap();
        sections.save(&[section()]).await;

        let state = three_sessions();
        let (notifier, _rx) = ChannelNotifier::new();
        let remote = Arc::new(MockSessions {
            failing: HashSet::from(["s1".to_string()]),
            ..Default::default()
        });
        let coordinator = MutationCoordinator::new(remote, Arc::new(notifier))
            .with_dependent(Arc::new(sections.clone()));

        coordinator.delete_session(&state, "s1").await;

        assert_eq!(sections.get().await.len(), 1);
    }

    /// s1's deletion is held until s2's deletion commits, then fails.
    async fn overlapping_deletes(
        policy: RollbackPolicy,
    ) -> (MutationOutcome, Vec<String>, Vec<Notice>) {
        let state = three_sessions();
        let remote = Arc::new(MockSessions {
            failing: HashSet::from(["s1".to_string()]),
            gated: Some("s1".to_string()),
            ..Default::default()
        });
        let (notifier, mut rx) = ChannelNotifier::new();
        let coordinator =
            MutationCoordinator::new(remote.clone(), Arc::new(notifier)).with_policy(policy);

        let (first, second) = tokio::join!(coordinator.delete_session(&state, "s1"), async {
            let outcome = coordinator.delete_session(&state, "s2").await;
            remote.gate.notify_one();
            outcome
        });
        assert!(first.error().is_some());
        assert!(second.is_committed());

        let mut notices = Vec::new();
        while let Ok(notice) = rx.try_recv() {
            notices.push(notice);
        }
        (first, ids(&state.items()), notices)
    }

    #[tokio::test]
    async fn test_guarded_rollback_keeps_newer_commit() {
        let (outcome, items, notices) = overlapping_deletes(RollbackPolicy::Guarded).await;

        assert!(matches!(outcome, MutationOutcome::Superseded(_)));
        assert_eq!(items, vec!["s3"]);
        assert_eq!(notices.len(), 2);
        assert_eq!(notices.iter().filter(|n| n.is_error()).count(), 1);
    }

    #[tokio::test]
    async fn test_unguarded_rollback_clobbers_newer_commit() {
        let (outcome, items, notices) = overlapping_deletes(RollbackPolicy::Unguarded).await;

        assert!(matches!(outcome, MutationOutcome::RolledBack(_)));
        assert_eq!(items, vec!["s1", "s2", "s3"]);
        assert_eq!(notices.len(), 2);
    }

    #[tokio::test]
    async fn test_tracker_pending_during_remote_call() {
        let state = three_sessions();
        let remote = Arc::new(MockSessions {
            gated: Some("s1".to_string()),
            ..Default::default()
        });
        let (coordinator, _rx) = coordinator(remote.clone());
        let tracker = coordinator.tracker(MutationKind::DeleteSession);

        let (outcome, was_pending) = tokio::join!(coordinator.delete_session(&state, "s1"), async {
            tokio::task::yield_now().await;
            let pending = tracker.is_pending();
            remote.gate.notify_one();
            pending
        });

        assert!(was_pending);
        assert!(outcome.is_committed());
        assert!(tracker.is_success());
    }

    #[tokio::test]
    async fn test_generic_run_with_custom_kind() {
        let state = three_sessions();
        let (coordinator, mut rx) = coordinator(Arc::new(MockSessions::default()));
        let next = vec![session("sec", "s9")];

        let outcome = coordinator
            .run(MutationKind::Custom("replace_all"), &state, next, || async {
                Ok(None)
            })
            .await;

        assert!(outcome.is_committed());
        assert_eq!(ids(&state.items()), vec!["s9"]);
        assert_eq!(rx.recv().await.unwrap().message, "Changes saved");
        assert!(coordinator
            .tracker(MutationKind::Custom("replace_all"))
            .is_success());
    }
}
