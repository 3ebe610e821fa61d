use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{FacilityId, HistoryId};
use crate::models::facility::Facility;

/// One recorded selection from the search interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub id: HistoryId,
    pub user_id: Option<String>,
    pub facility_id: Option<FacilityId>,
    pub search_query: String,
    pub created_at: DateTime<Utc>,
}

impl SearchHistoryEntry {
    #[must_use]
    pub fn from_new(id: HistoryId, new: NewSearchHistory) -> Self {
        Self {
            id,
            user_id: new.user_id.filter(|u| !u.is_empty()),
            facility_id: new.facility_id.filter(|f| !f.as_str().is_empty()),
            search_query: new.search_query,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSearchHistory {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub facility_id: Option<FacilityId>,
    pub search_query: String,
}

/// A history entry joined with the facility it references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(flatten)]
    pub entry: SearchHistoryEntry,
    pub facility: Option<Facility>,
}
