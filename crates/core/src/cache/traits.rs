use async_trait::async_trait;

use super::Result;

/// A process-wide key/value medium holding opaque cache blobs.
///
/// Writes overwrite wholesale; there is no merge and no concurrency token.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Gets a value by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores a value, replacing any previous one.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Deletes a value. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Lists the keys currently held.
    async fn keys(&self) -> Result<Vec<String>>;
}
