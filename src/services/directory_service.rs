//! Domain service for the facility directory.
//!
//! Handles text search with upsert-by-place-id caching, and the append-only
//! search history with its join against stored facilities.

use thiserror::Error;

use crate::clients::LookupError;
use crate::db::StoreError;
use crate::domain::{Coordinates, FacilityId};
use crate::models::{Facility, FacilityUpdate, HistoryItem, NewSearchHistory, SearchHistoryEntry};

/// Errors specific to directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<LookupError> for DirectoryError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Configuration(msg) => Self::Configuration(msg),
            err @ (LookupError::Upstream { .. } | LookupError::Transport(_)) => {
                Self::Upstream(err.to_string())
            }
        }
    }
}

impl From<StoreError> for DirectoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Conflict { .. } => Self::Validation(err.to_string()),
        }
    }
}

/// A history write as received from a client. `search_query` stays optional
/// here so its absence is reported as a validation failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub facility_id: Option<FacilityId>,
    #[serde(default)]
    pub search_query: Option<String>,
}

impl HistoryRequest {
    /// Checks required fields and converts into an insert payload.
    pub fn validate(self) -> Result<NewSearchHistory, DirectoryError> {
        let search_query = self
            .search_query
            .ok_or_else(|| DirectoryError::Validation("searchQuery is required".to_string()))?;

        Ok(NewSearchHistory {
            user_id: self.user_id,
            facility_id: self.facility_id,
            search_query,
        })
    }
}

/// Domain service trait for the facility directory.
#[async_trait::async_trait]
pub trait DirectoryService: Send + Sync {
    /// Searches facilities and caches every result by place id.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::InvalidInput`] when `query` is missing or blank
    /// - [`DirectoryError::Configuration`] when the provider has no credential
    /// - [`DirectoryError::Upstream`] when the provider fails
    async fn search_facilities(
        &self,
        query: Option<&str>,
        location: Option<Coordinates>,
    ) -> Result<Vec<Facility>, DirectoryError>;

    /// Records a selection. `facility_id` is not checked against the store.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Validation`] when `searchQuery` is absent.
    async fn append_history(
        &self,
        request: HistoryRequest,
    ) -> Result<SearchHistoryEntry, DirectoryError>;

    /// Most recent history entries joined with their facility.
    async fn list_history(&self, user_id: Option<&str>)
    -> Result<Vec<HistoryItem>, DirectoryError>;

    async fn get_facility(&self, id: &FacilityId) -> Result<Facility, DirectoryError>;

    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] when no facility has `id`.
    async fn update_facility(
        &self,
        id: &FacilityId,
        update: FacilityUpdate,
    ) -> Result<Facility, DirectoryError>;
}
