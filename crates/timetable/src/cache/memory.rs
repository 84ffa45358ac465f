//! In-memory key/value medium with LRU eviction.

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use timetable_core::cache::{KeyValueStore, Result};

/// Process-wide in-memory medium.
///
/// Thread-safe store using `Arc<RwLock<LruCache>>` for concurrent access.
/// Once `max_entries` blobs are held the least recently used one is evicted.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    store: Arc<RwLock<LruCache<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Creates a new in-memory store holding at most `max_entries` blobs.
    pub fn new(max_entries: NonZeroUsize) -> Self {
        Self {
            store: Arc::new(RwLock::new(LruCache::new(max_entries))),
        }
    }

    /// Returns the number of blobs currently held.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // `LruCache::get` bumps recency, so it needs the write lock.
        let mut store = self.store.write().await;
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let store = self.store.read().await;
        Ok(store.iter().map(|(key, _)| key.clone()).collect())
    }
}
