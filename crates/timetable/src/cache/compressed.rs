//! Compressed, per-collection cache over a key/value medium.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use timetable_core::cache::{
    collection_key, decode_collection, encode_collection, namespaced_key, Codec, KeyValueStore,
};
use timetable_core::schedule::{remove_first, upsert_by, Entity};

use super::Invalidate;

/// One compressed blob holding a whole entity collection.
///
/// Reads never fail: a missing or unreadable blob is an empty collection.
/// Write failures of the medium are logged and swallowed.
///
/// # Type Parameters
///
/// * `T` - The entity kind held in the blob
/// * `S` - The key/value medium
pub struct CompressedCacheStore<T, S: ?Sized = dyn KeyValueStore> {
    store: Arc<S>,
    codec: Arc<dyn Codec>,
    key: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S: ?Sized> Clone for CompressedCacheStore<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            codec: Arc::clone(&self.codec),
            key: self.key.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T, S> CompressedCacheStore<T, S>
where
    T: Entity,
    S: KeyValueStore + ?Sized,
{
    pub fn new(store: Arc<S>, codec: Arc<dyn Codec>, key: impl Into<String>) -> Self {
        Self {
            store,
            codec,
            key: key.into(),
            _entity: PhantomData,
        }
    }

    /// Creates the store for `T`'s fixed collection key, or `None` when the
    /// kind is never cached.
    pub fn for_entity(store: Arc<S>, codec: Arc<dyn Codec>, namespace: Option<&str>) -> Option<Self> {
        let key = collection_key(T::KIND)?;
        Some(Self::new(store, codec, namespaced_key(namespace, key)))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored collection, or an empty one.
    pub async fn get(&self) -> Vec<T> {
        let bytes = match self.store.get(&self.key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "Cache read failed");
                return Vec::new();
            }
        };

        match decode_collection(&bytes, self.codec.as_ref()) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    codec = self.codec.name(),
                    error = %err,
                    "Unreadable cache blob, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Replaces the stored collection wholesale.
    pub async fn save(&self, items: &[T]) {
        let bytes = match encode_collection(items, self.codec.as_ref()) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "Failed to encode collection");
                return;
            }
        };

        if let Err(err) = self.store.delete(&self.key).await {
            tracing::warn!(key = %self.key, error = %err, "Failed to clear cache before save");
        }
        if let Err(err) = self.store.set(&self.key, &bytes).await {
            tracing::warn!(key = %self.key, error = %err, "Failed to save collection");
            return;
        }

        tracing::trace!(
            key = %self.key,
            items = items.len(),
            bytes = bytes.len(),
            "Saved collection"
        );
    }

    /// Replaces the first element matching `id_equals`, or appends `item`.
    pub async fn upsert_one<F>(&self, item: T, id_equals: F)
    where
        F: Fn(&T, &T) -> bool,
    {
        let items = upsert_by(self.get().await, item, id_equals);
        self.save(&items).await;
    }

    /// Removes the first element with identity `id`. No-op without a match.
    pub async fn delete_one(&self, id: &T::Id) {
        let (items, removed) = remove_first(self.get().await, |item| item.id() == *id);
        if removed {
            self.save(&items).await;
        }
    }

    /// Removes the record entirely.
    pub async fn clear(&self) {
        match self.store.delete(&self.key).await {
            Ok(()) => tracing::trace!(key = %self.key, "Cleared collection"),
            Err(err) => tracing::warn!(key = %self.key, error = %err, "Failed to clear cache"),
        }
    }
}

#[async_trait]
impl<T, S> Invalidate for CompressedCacheStore<T, S>
where
    T: Entity,
    S: KeyValueStore + ?Sized,
{
    fn name(&self) -> &str {
        &self.key
    }

    async fn invalidate(&self) {
        self.clear().await;
    }
}
