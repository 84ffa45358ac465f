//! Cache media and the compressed collection store built on them.
//!
//! The media implement `timetable_core::cache::KeyValueStore`; which one is
//! used is decided at runtime from [`crate::config::CacheBackend`].

mod compressed;
mod file;
mod memory;

use async_trait::async_trait;

pub use compressed::CompressedCacheStore;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Something holding cached data that a committed mutation can make stale.
#[async_trait]
pub trait Invalidate: Send + Sync {
    /// A label for logs, usually the cache key.
    fn name(&self) -> &str;

    /// Drops the cached data so the next read goes remote.
    async fn invalidate(&self);
}
