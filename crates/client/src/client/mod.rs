//! HTTP client for the timetable API.

mod collection;
mod paths;

pub use collection::HttpCollection;
pub use paths::{item_path, massive_path, update_times_path};

use reqwest::{Method, RequestBuilder};
use timetable_core::schedule::Entity;

use crate::error::{ClientError, Result};

/// HTTP client for the timetable API.
#[derive(Debug, Clone)]
pub struct TimetableClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl TimetableClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns a remote collection for entity `T`.
    pub fn collection<T: Entity>(&self) -> HttpCollection<T> {
        HttpCollection::new(self.clone())
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "Sending request");
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Handle error responses.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(ClientError::from)
        } else {
            Err(Self::server_error(response).await)
        }
    }

    /// Handle responses whose body is ignored.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::server_error(response).await)
        }
    }

    async fn server_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        tracing::debug!(status, "Server rejected request");
        ClientError::ServerError { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = TimetableClient::new("http://localhost:3000/api/");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.url("/days"), "http://localhost:3000/api/days");
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let client = TimetableClient::new("http://localhost").with_token(Some(String::new()));
        assert!(client.token.is_none());
    }
}
