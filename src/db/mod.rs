//! In-memory record store.
//!
//! `Store` is constructed once at startup and handed to every consumer through
//! application state. Each table sits behind its own lock and every public
//! operation takes that lock exactly once, so individual operations are atomic
//! with respect to each other.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::{FacilityId, HistoryId, UserId};
use crate::models::{
    Facility, FacilityUpdate, NewFacility, NewSearchHistory, NewUser, SearchHistoryEntry, User,
};

pub mod repositories;

use repositories::facility::{FacilityRepository, FacilityTable};
use repositories::history::{HistoryRepository, HistoryTable};
use repositories::user::{UserRepository, UserTable};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {key}")]
    Conflict { entity: &'static str, key: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result of an insert-if-absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Upserted {
    Created(Facility),
    Existing(Facility),
}

impl Upserted {
    #[must_use]
    pub const fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    #[must_use]
    pub fn into_inner(self) -> Facility {
        match self {
            Self::Created(f) | Self::Existing(f) => f,
        }
    }
}

#[derive(Default)]
struct Tables {
    facilities: RwLock<FacilityTable>,
    history: RwLock<HistoryTable>,
    users: RwLock<UserTable>,
}

#[derive(Clone, Default)]
pub struct Store {
    tables: Arc<Tables>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn facility_repo(&self) -> FacilityRepository<'_> {
        FacilityRepository::new(&self.tables.facilities)
    }

    fn history_repo(&self) -> HistoryRepository<'_> {
        HistoryRepository::new(&self.tables.history)
    }

    fn user_repo(&self) -> UserRepository<'_> {
        UserRepository::new(&self.tables.users)
    }

    pub async fn get_facility(&self, id: &FacilityId) -> Option<Facility> {
        self.facility_repo().get(id).await
    }

    pub async fn get_facility_by_place_id(&self, place_id: &str) -> Option<Facility> {
        self.facility_repo().get_by_place_id(place_id).await
    }

    pub async fn get_facilities(&self, ids: &[FacilityId]) -> Vec<Option<Facility>> {
        self.facility_repo().get_many(ids).await
    }

    /// Inserts a facility unconditionally.
    ///
    /// Fails with [`StoreError::Conflict`] when the place id is already stored.
    pub async fn create_facility(&self, facility: NewFacility) -> StoreResult<Facility> {
        self.facility_repo().create(facility).await
    }

    /// Returns the stored facility for the place id, inserting `facility` only
    /// when none exists. An existing record is never overwritten.
    pub async fn get_or_create_facility(&self, facility: NewFacility) -> Upserted {
        self.facility_repo().get_or_create(facility).await
    }

    pub async fn update_facility(
        &self,
        id: &FacilityId,
        update: FacilityUpdate,
    ) -> StoreResult<Facility> {
        self.facility_repo().update(id, update).await
    }

    pub async fn facility_count(&self) -> usize {
        self.facility_repo().count().await
    }

    pub async fn create_search_history(&self, entry: NewSearchHistory) -> SearchHistoryEntry {
        self.history_repo().create(entry).await
    }

    pub async fn get_search_history_entry(&self, id: &HistoryId) -> Option<SearchHistoryEntry> {
        self.history_repo().get(id).await
    }

    /// Most recent entries first, optionally filtered by user, at most `limit`.
    pub async fn get_search_history(
        &self,
        user_id: Option<&str>,
        limit: usize,
    ) -> Vec<SearchHistoryEntry> {
        self.history_repo().recent(user_id, limit).await
    }

    pub async fn get_user(&self, id: &UserId) -> Option<User> {
        self.user_repo().get(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        self.user_repo().create(user).await
    }
}
