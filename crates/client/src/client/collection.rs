//! Remote collections over HTTP.

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::Method;
use timetable_core::remote::{self, RemoteCollection, SessionRemote};
use timetable_core::schedule::{Entity, SectionSession, SlotChange};

use super::paths::{item_path, massive_path, update_times_path};
use super::TimetableClient;
use crate::error::Result;

/// The HTTP endpoint backing one entity collection.
#[derive(Debug, Clone)]
pub struct HttpCollection<T> {
    client: TimetableClient,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> HttpCollection<T> {
    pub fn new(client: TimetableClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    async fn fetch_all(&self) -> Result<Vec<T>> {
        let response = self
            .client
            .request(Method::GET, &T::KIND.endpoint())
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    async fn delete_path(&self, path: &str) -> Result<()> {
        let response = self.client.request(Method::DELETE, path).send().await?;
        self.client.handle_empty_response(response).await
    }
}

#[async_trait]
impl<T: Entity> RemoteCollection<T> for HttpCollection<T> {
    async fn list(&self) -> remote::Result<Vec<T>> {
        Ok(self.fetch_all().await?)
    }

    async fn delete(&self, id: &T::Id) -> remote::Result<()> {
        Ok(self.delete_path(&item_path(T::KIND, id)).await?)
    }

    async fn delete_many(&self, ids: &[T::Id]) -> remote::Result<()> {
        Ok(self.delete_path(&massive_path(T::KIND, ids)).await?)
    }
}

impl HttpCollection<SectionSession> {
    async fn patch_times(
        &self,
        section_id: &str,
        changes: &[SlotChange],
    ) -> Result<Vec<SectionSession>> {
        let path = update_times_path(SectionSession::KIND, section_id);
        let response = self
            .client
            .request(Method::PATCH, &path)
            .json(changes)
            .send()
            .await?;
        self.client.handle_response(response).await
    }
}

#[async_trait]
impl SessionRemote for HttpCollection<SectionSession> {
    async fn update_times(
        &self,
        section_id: &str,
        changes: &[SlotChange],
    ) -> remote::Result<Vec<SectionSession>> {
        Ok(self.patch_times(section_id, changes).await?)
    }
}
