//! Construction of the long-lived objects from a [`Config`].

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use timetable_client::TimetableClient;
use timetable_core::cache::{
    all_collection_keys, collection_key, namespaced_key, Codec, KeyValueStore, ZstdCodec,
};
use timetable_core::schedule::{Entity, EntityKind, Section, SectionSession};

use crate::cache::{CompressedCacheStore, FileStore, MemoryStore};
use crate::config::{CacheBackend, Config};
use crate::mutation::MutationCoordinator;
use crate::notify::Notifier;
use crate::repository::EntityRepository;

type RepositoryMap = HashMap<EntityKind, Arc<dyn Any + Send + Sync>>;

/// Shared medium, codec and HTTP client.
///
/// Holds one repository per entity kind, so every consumer of a kind sees
/// the same state and the same stale-fetch ordering.
#[derive(Clone)]
pub struct Services {
    config: Config,
    store: Arc<dyn KeyValueStore>,
    codec: Arc<dyn Codec>,
    client: TimetableClient,
    repositories: Arc<Mutex<RepositoryMap>>,
}

impl Services {
    pub fn new(config: Config) -> Self {
        let store: Arc<dyn KeyValueStore> = match config.cache_backend {
            CacheBackend::Memory => Arc::new(MemoryStore::new(config.cache_max_entries)),
            CacheBackend::File => Arc::new(FileStore::new(config.cache_dir.clone())),
        };
        let codec: Arc<dyn Codec> = Arc::new(ZstdCodec::new(config.compression_level));
        let client = TimetableClient::new(config.base_url.clone()).with_token(config.token.clone());

        tracing::debug!(
            base_url = %config.base_url,
            backend = ?config.cache_backend,
            codec = codec.name(),
            "Services initialised"
        );

        Self {
            config,
            store,
            codec,
            client,
            repositories: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    /// The compressed cache for `T`, if the kind is cached.
    pub fn cache<T: Entity>(&self) -> Option<CompressedCacheStore<T>> {
        CompressedCacheStore::for_entity(
            self.store(),
            Arc::clone(&self.codec),
            self.config.cache_namespace.as_deref(),
        )
    }

    /// The repository for `T`, created on first use.
    pub fn repository<T: Entity>(&self) -> Arc<EntityRepository<T>> {
        let mut repositories = self
            .repositories
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = repositories.get(&T::KIND) {
            if let Ok(repository) = Arc::clone(existing).downcast::<EntityRepository<T>>() {
                return repository;
            }
        }

        let repository = Arc::new(EntityRepository::new(
            Arc::new(self.client.collection::<T>()),
            self.cache::<T>(),
        ));
        repositories.insert(T::KIND, repository.clone());
        repository
    }

    /// A coordinator for session mutations. Sections carry per-kind session
    /// counts, so their cache is dropped on every commit.
    pub fn coordinator(&self, notifier: Arc<dyn Notifier>) -> MutationCoordinator {
        let coordinator =
            MutationCoordinator::new(Arc::new(self.client.collection::<SectionSession>()), notifier)
                .with_policy(self.config.rollback_policy);

        match self.cache::<Section>() {
            Some(sections) => coordinator.with_dependent(Arc::new(sections)),
            None => coordinator,
        }
    }

    /// Removes cached collections: one kind, or all of them.
    ///
    /// Returns the keys that were cleared.
    pub async fn clear_cache(&self, kind: Option<EntityKind>) -> Vec<String> {
        let keys: Vec<&str> = match kind {
            Some(kind) => collection_key(kind).into_iter().collect(),
            None => all_collection_keys(),
        };

        let mut cleared = Vec::with_capacity(keys.len());
        for key in keys {
            let key = namespaced_key(self.config.cache_namespace.as_deref(), key);
            match self.store.delete(&key).await {
                Ok(()) => cleared.push(key),
                Err(err) => tracing::warn!(key = %key, error = %err, "Failed to clear cache"),
            }
        }
        cleared
    }
}
