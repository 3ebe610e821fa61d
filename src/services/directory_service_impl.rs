//! In-memory implementation of the `DirectoryService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clients::{FacilityLookup, LookupQuery};
use crate::constants::limits::{HISTORY_PAGE_SIZE, MAX_SEARCH_RESULTS};
use crate::db::{Store, Upserted};
use crate::domain::{Coordinates, FacilityId};
use crate::models::{Facility, FacilityUpdate, HistoryItem, SearchHistoryEntry};
use crate::services::directory_service::{DirectoryError, DirectoryService, HistoryRequest};

pub struct InMemoryDirectoryService {
    store: Store,
    lookup: Arc<dyn FacilityLookup>,
}

impl InMemoryDirectoryService {
    #[must_use]
    pub fn new(store: Store, lookup: Arc<dyn FacilityLookup>) -> Self {
        Self { store, lookup }
    }

    fn normalize_query(query: Option<&str>) -> Result<&str, DirectoryError> {
        query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| DirectoryError::InvalidInput("Search query is required".to_string()))
    }
}

#[async_trait]
impl DirectoryService for InMemoryDirectoryService {
    async fn search_facilities(
        &self,
        query: Option<&str>,
        location: Option<Coordinates>,
    ) -> Result<Vec<Facility>, DirectoryError> {
        let text = Self::normalize_query(query)?;

        let request = LookupQuery {
            text: text.to_string(),
            location,
            limit: MAX_SEARCH_RESULTS,
        };

        let found = self.lookup.lookup(&request).await.inspect_err(|e| {
            warn!(provider = self.lookup.name(), query = %text, "Facility lookup failed: {e}");
        })?;

        let mut facilities = Vec::with_capacity(found.len().min(MAX_SEARCH_RESULTS));
        for candidate in found.into_iter().take(MAX_SEARCH_RESULTS) {
            let upserted = self.store.get_or_create_facility(candidate).await;
            let outcome = if upserted.was_created() {
                "created"
            } else {
                "existing"
            };
            metrics::counter!("facility_upserts_total", "outcome" => outcome).increment(1);

            if let Upserted::Existing(ref existing) = upserted {
                debug!(place_id = %existing.place_id, "Facility already cached, keeping stored record");
            }
            facilities.push(upserted.into_inner());
        }

        info!(
            provider = self.lookup.name(),
            query = %text,
            results = facilities.len(),
            "Facility search completed"
        );

        Ok(facilities)
    }

    async fn append_history(
        &self,
        request: HistoryRequest,
    ) -> Result<SearchHistoryEntry, DirectoryError> {
        let new = request.validate()?;
        let entry = self.store.create_search_history(new).await;
        debug!(id = %entry.id, query = %entry.search_query, "Search history recorded");
        Ok(entry)
    }

    async fn list_history(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<HistoryItem>, DirectoryError> {
        let entries = self
            .store
            .get_search_history(user_id, HISTORY_PAGE_SIZE)
            .await;

        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            let facility = match &entry.facility_id {
                Some(id) => self.store.get_facility(id).await,
                None => None,
            };
            items.push(HistoryItem { entry, facility });
        }

        Ok(items)
    }

    async fn get_facility(&self, id: &FacilityId) -> Result<Facility, DirectoryError> {
        self.store
            .get_facility(id)
            .await
            .ok_or_else(|| DirectoryError::NotFound(format!("Facility not found: {id}")))
    }

    async fn update_facility(
        &self,
        id: &FacilityId,
        update: FacilityUpdate,
    ) -> Result<Facility, DirectoryError> {
        Ok(self.store.update_facility(id, update).await?)
    }
}
