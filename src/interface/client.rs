use async_trait::async_trait;
use reqwest::{Client, Response};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::api::{ErrorBody, FacilitiesResponse, HistoryResponse, SavedSearchResponse};
use crate::models::{Facility, HistoryItem, SearchHistoryEntry};
use crate::services::HistoryRequest;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API base URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// The directory API as seen by the search interface.
#[async_trait]
pub trait FacilityApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Facility>, ClientError>;

    async fn append_history(
        &self,
        request: &HistoryRequest,
    ) -> Result<SearchHistoryEntry, ClientError>;

    async fn history(&self, user_id: Option<&str>) -> Result<Vec<HistoryItem>, ClientError>;
}

/// HTTP client for a running directory server.
#[derive(Clone)]
pub struct DirectoryClient {
    client: Client,
    base_url: Url,
}

impl DirectoryClient {
    /// `base_url` may carry a path prefix; routes are joined below it with
    /// or without a trailing slash.
    pub fn new(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, route: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(&format!("api/{route}"))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    /// Turns a non-success status into [`ClientError::Api`] using the
    /// `{error}` body when there is one.
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl FacilityApi for DirectoryClient {
    async fn search(&self, query: &str) -> Result<Vec<Facility>, ClientError> {
        let mut url = self.endpoint("search-facilities")?;
        url.query_pairs_mut().append_pair("query", query);

        debug!(query, "Searching facilities");

        let response = Self::check(self.client.get(url).send().await?).await?;
        let body: FacilitiesResponse = response.json().await?;
        Ok(body.facilities)
    }

    async fn append_history(
        &self,
        request: &HistoryRequest,
    ) -> Result<SearchHistoryEntry, ClientError> {
        let url = self.endpoint("search-history")?;

        let response = Self::check(self.client.post(url).json(request).send().await?).await?;
        let body: SavedSearchResponse = response.json().await?;
        Ok(body.search)
    }

    async fn history(&self, user_id: Option<&str>) -> Result<Vec<HistoryItem>, ClientError> {
        let mut url = self.endpoint("search-history")?;
        if let Some(user_id) = user_id {
            url.query_pairs_mut().append_pair("userId", user_id);
        }

        let response = Self::check(self.client.get(url).send().await?).await?;
        let body: HistoryResponse = response.json().await?;
        Ok(body.history)
    }
}
