use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::db::{StoreError, StoreResult, Upserted};
use crate::domain::FacilityId;
use crate::models::{Facility, FacilityUpdate, NewFacility};

#[derive(Default)]
pub struct FacilityTable {
    rows: HashMap<FacilityId, Facility>,
    by_place_id: HashMap<String, FacilityId>,
}

impl FacilityTable {
    fn insert(&mut self, new: NewFacility) -> Facility {
        let id = FacilityId::generate();
        let facility = Facility::from_new(id.clone(), new);
        self.by_place_id
            .insert(facility.place_id.clone(), id.clone());
        self.rows.insert(id, facility.clone());
        facility
    }

    fn find_by_place_id(&self, place_id: &str) -> Option<&Facility> {
        self.by_place_id
            .get(place_id)
            .and_then(|id| self.rows.get(id))
    }
}

pub struct FacilityRepository<'a> {
    table: &'a RwLock<FacilityTable>,
}

impl<'a> FacilityRepository<'a> {
    #[must_use]
    pub const fn new(table: &'a RwLock<FacilityTable>) -> Self {
        Self { table }
    }

    pub async fn get(&self, id: &FacilityId) -> Option<Facility> {
        self.table.read().await.rows.get(id).cloned()
    }

    pub async fn get_by_place_id(&self, place_id: &str) -> Option<Facility> {
        self.table.read().await.find_by_place_id(place_id).cloned()
    }

    pub async fn get_many(&self, ids: &[FacilityId]) -> Vec<Option<Facility>> {
        let table = self.table.read().await;
        ids.iter().map(|id| table.rows.get(id).cloned()).collect()
    }

    pub async fn create(&self, new: NewFacility) -> StoreResult<Facility> {
        let mut table = self.table.write().await;
        if table.by_place_id.contains_key(&new.place_id) {
            return Err(StoreError::Conflict {
                entity: "Facility",
                key: new.place_id,
            });
        }
        Ok(table.insert(new))
    }

    pub async fn get_or_create(&self, new: NewFacility) -> Upserted {
        let mut table = self.table.write().await;
        if let Some(existing) = table.find_by_place_id(&new.place_id) {
            return Upserted::Existing(existing.clone());
        }
        Upserted::Created(table.insert(new))
    }

    pub async fn update(&self, id: &FacilityId, update: FacilityUpdate) -> StoreResult<Facility> {
        let mut table = self.table.write().await;
        let facility = table.rows.get_mut(id).ok_or_else(|| StoreError::NotFound {
            entity: "Facility",
            id: id.to_string(),
        })?;
        facility.apply(update);
        Ok(facility.clone())
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}
