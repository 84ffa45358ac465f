//! Cache-first entity repositories.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use timetable_core::remote::{RemoteCollection, RemoteError};
use timetable_core::schedule::{Entity, EntityKind};

use crate::cache::{CompressedCacheStore, Invalidate};

/// What a consumer sees of a collection: the value and its load status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<RemoteError>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Read-through repository for one entity kind.
///
/// Implements the cache-aside pattern:
/// - **Reads**: a non-empty cached collection short-circuits the remote
/// - **Misses**: read remote, derive fields, populate the cache, publish
///
/// Kinds without a cache key always read remote. Failures never escape:
/// they land in [`FetchState::error`] and the previous items are kept.
pub struct EntityRepository<T: Entity> {
    remote: Arc<dyn RemoteCollection<T>>,
    cache: Option<CompressedCacheStore<T>>,
    state: watch::Sender<FetchState<T>>,
    latest_ticket: AtomicU64,
    /// Ticket of the last fetch whose items were published.
    published_ticket: AtomicU64,
}

impl<T: Entity> EntityRepository<T> {
    /// Creates a repository. Pass `None` for kinds that are never cached.
    pub fn new(remote: Arc<dyn RemoteCollection<T>>, cache: Option<CompressedCacheStore<T>>) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            remote,
            cache,
            state,
            latest_ticket: AtomicU64::new(0),
            published_ticket: AtomicU64::new(0),
        }
    }

    pub fn kind(&self) -> EntityKind {
        T::KIND
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Returns the last published state.
    pub fn current(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    /// Observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    /// Returns the cached collection if there is one, else reads remote.
    pub async fn fetch(&self) -> FetchState<T> {
        if let Some(cache) = &self.cache {
            let cached = cache.get().await;
            if !cached.is_empty() {
                tracing::trace!(kind = %T::KIND, items = cached.len(), "Cache hit");
                self.state.send_modify(|state| {
                    state.items = cached;
                    state.loading = false;
                    state.error = None;
                });
                return self.current();
            }
            tracing::trace!(kind = %T::KIND, "Cache miss");
        }

        self.load_remote().await
    }

    /// Reads remote regardless of the cache.
    pub async fn refetch(&self) -> FetchState<T> {
        self.load_remote().await
    }

    async fn load_remote(&self) -> FetchState<T> {
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| state.loading = true);

        let result = self.remote.list().await;

        if !self.is_latest(ticket) {
            tracing::debug!(kind = %T::KIND, ticket, "Discarding stale fetch");
            return self.current();
        }

        match result {
            Ok(items) => {
                let items: Vec<T> = items.into_iter().map(T::with_derived_fields).collect();
                if let Some(cache) = &self.cache {
                    cache.save(&items).await;
                    // A newer fetch may have started while the blob was written.
                    if !self.is_latest(ticket) {
                        return self.discard_after_save(cache, ticket).await;
                    }
                }
                tracing::debug!(kind = %T::KIND, items = items.len(), "Fetched collection");
                self.state.send_modify(|state| {
                    state.items = items;
                    state.loading = false;
                    state.error = None;
                    self.published_ticket.fetch_max(ticket, Ordering::SeqCst);
                });
            }
            Err(err) => {
                tracing::warn!(kind = %T::KIND, error = %err, "Fetch failed");
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(err);
                });
            }
        }

        self.current()
    }

    fn is_latest(&self, ticket: u64) -> bool {
        ticket == self.latest_ticket.load(Ordering::SeqCst)
    }

    /// Drops a fetch that went stale during its cache write. If a newer
    /// fetch already published, its items are written back over the stale
    /// blob; otherwise the newer fetch still owns the next write.
    async fn discard_after_save(
        &self,
        cache: &CompressedCacheStore<T>,
        ticket: u64,
    ) -> FetchState<T> {
        tracing::debug!(kind = %T::KIND, ticket, "Discarding stale fetch after cache write");
        let newer = {
            let state = self.state.borrow();
            (self.published_ticket.load(Ordering::SeqCst) > ticket).then(|| state.clone())
        };
        match newer {
            Some(current) => {
                cache.save(&current.items).await;
                current
            }
            None => self.current(),
        }
    }

    /// Writes one item through to the cache.
    pub async fn cache_upsert(&self, item: T) {
        if let Some(cache) = &self.cache {
            cache
                .upsert_one(item.with_derived_fields(), |a, b| a.id() == b.id())
                .await;
        }
    }

    /// Removes one item from the cache.
    pub async fn cache_delete(&self, id: &T::Id) {
        if let Some(cache) = &self.cache {
            cache.delete_one(id).await;
        }
    }

    /// Clears the cached collection so the next `fetch` goes remote.
    pub async fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.clear().await;
        }
    }
}

#[async_trait]
impl<T: Entity> Invalidate for EntityRepository<T> {
    fn name(&self) -> &str {
        T::KIND.as_str()
    }

    async fn invalidate(&self) {
        EntityRepository::invalidate(self).await;
    }
}
