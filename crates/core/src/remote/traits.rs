use async_trait::async_trait;

use crate::schedule::{Entity, SectionSession, SlotChange};

use super::Result;

/// The remote authority for one entity collection.
#[async_trait]
pub trait RemoteCollection<T: Entity>: Send + Sync {
    /// `GET <endpoint>`: the full collection.
    async fn list(&self) -> Result<Vec<T>>;

    /// `DELETE <endpoint>/<id>`.
    async fn delete(&self, id: &T::Id) -> Result<()>;

    /// `DELETE <endpoint>/massive/<id,id,...>`.
    async fn delete_many(&self, ids: &[T::Id]) -> Result<()>;
}

/// Remote operations specific to section sessions.
#[async_trait]
pub trait SessionRemote: RemoteCollection<SectionSession> {
    /// `PATCH <endpoint>/update-times/<section_id>` with one
    /// `{sessionId, dayModuleId}` pair per change. Returns the server's
    /// canonical view of the updated sessions.
    async fn update_times(
        &self,
        section_id: &str,
        changes: &[SlotChange],
    ) -> Result<Vec<SectionSession>>;
}
