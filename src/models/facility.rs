use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{Coordinates, FacilityId};

/// Category of a healthcare facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacilityType {
    Hospital,
    Pharmacy,
    #[default]
    Clinic,
}

impl FacilityType {
    pub const ALL: [Self; 3] = [Self::Hospital, Self::Pharmacy, Self::Clinic];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hospital => "hospital",
            Self::Pharmacy => "pharmacy",
            Self::Clinic => "clinic",
        }
    }

    /// Infers the category from provider type tags.
    ///
    /// Priority is hospital, then pharmacy, then clinic; anything else is a
    /// clinic.
    #[must_use]
    pub fn from_place_types<S: AsRef<str>>(types: &[S]) -> Self {
        let has = |tag: &str| types.iter().any(|t| t.as_ref().eq_ignore_ascii_case(tag));

        if has("hospital") {
            Self::Hospital
        } else if has("pharmacy") || has("drugstore") {
            Self::Pharmacy
        } else {
            Self::Clinic
        }
    }

    /// Category named by a free-text query, if any.
    #[must_use]
    pub fn from_query_hint(query: &str) -> Option<Self> {
        let query = query.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| query.contains(t.as_str()))
    }

    /// Provider type filter used when the query names a category.
    #[must_use]
    pub const fn provider_type(&self) -> &'static str {
        match self {
            Self::Hospital => "hospital",
            Self::Pharmacy => "pharmacy",
            Self::Clinic => "doctor",
        }
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored healthcare facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: FacilityId,
    pub place_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub facility_type: FacilityType,
    pub address: String,
    pub phone: Option<String>,
    pub hours: Option<String>,
    pub rating: Option<String>,
    pub distance: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Facility {
    /// Materializes an insert payload into a stored record.
    ///
    /// Empty optional strings are normalized to `None`.
    #[must_use]
    pub fn from_new(id: FacilityId, new: NewFacility) -> Self {
        Self {
            id,
            place_id: new.place_id,
            name: new.name,
            facility_type: new.facility_type,
            address: new.address,
            phone: non_empty(new.phone),
            hours: non_empty(new.hours),
            rating: non_empty(new.rating),
            distance: non_empty(new.distance),
            latitude: non_empty(new.latitude),
            longitude: non_empty(new.longitude),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_text(self.latitude.as_deref(), self.longitude.as_deref())
    }

    /// Applies the fields present in `update`.
    pub fn apply(&mut self, update: FacilityUpdate) {
        let FacilityUpdate {
            name,
            facility_type,
            address,
            phone,
            hours,
            rating,
            distance,
            latitude,
            longitude,
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(facility_type) = facility_type {
            self.facility_type = facility_type;
        }
        if let Some(address) = address {
            self.address = address;
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        if let Some(hours) = hours {
            self.hours = hours;
        }
        if let Some(rating) = rating {
            self.rating = rating;
        }
        if let Some(distance) = distance {
            self.distance = distance;
        }
        if let Some(latitude) = latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = longitude {
            self.longitude = longitude;
        }
    }
}

/// Insert payload for a facility, produced by lookup collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFacility {
    pub place_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub facility_type: FacilityType,
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
}

impl NewFacility {
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_text(self.latitude.as_deref(), self.longitude.as_deref())
    }
}

/// Partial update. The outer `Option` marks presence; for nullable fields the
/// inner `Option` is the new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityUpdate {
    pub name: Option<String>,
    pub facility_type: Option<FacilityType>,
    pub address: Option<String>,
    pub phone: Option<Option<String>>,
    pub hours: Option<Option<String>>,
    pub rating: Option<Option<String>>,
    pub distance: Option<Option<String>>,
    pub latitude: Option<Option<String>>,
    pub longitude: Option<Option<String>>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Formats a distance the way facilities carry it, e.g. `"0.8 miles"`.
#[must_use]
pub fn format_distance(miles: f64) -> String {
    format!("{miles:.1} miles")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewFacility {
        NewFacility {
            place_id: "p1".to_string(),
            name: "Apollo Hospital".to_string(),
            facility_type: FacilityType::Hospital,
            address: "320 Fortis Blvd".to_string(),
            phone: Some(String::new()),
            hours: Some("Mon-Sun: 24 hours".to_string()),
            rating: None,
            distance: None,
            latitude: Some("40.7128".to_string()),
            longitude: Some("-74.0060".to_string()),
        }
    }

    #[test]
    fn category_priority_prefers_hospital() {
        let tags = ["pharmacy", "hospital", "health"];
        assert_eq!(FacilityType::from_place_types(&tags), FacilityType::Hospital);

        let tags = ["store", "pharmacy", "doctor"];
        assert_eq!(FacilityType::from_place_types(&tags), FacilityType::Pharmacy);

        let tags = ["doctor", "health"];
        assert_eq!(FacilityType::from_place_types(&tags), FacilityType::Clinic);

        let tags: [&str; 0] = [];
        assert_eq!(FacilityType::from_place_types(&tags), FacilityType::Clinic);
    }

    #[test]
    fn query_hint_detects_category_words() {
        assert_eq!(
            FacilityType::from_query_hint("24h Pharmacy near me"),
            Some(FacilityType::Pharmacy)
        );
        assert_eq!(
            FacilityType::from_query_hint("walk-in clinic"),
            Some(FacilityType::Clinic)
        );
        assert_eq!(FacilityType::from_query_hint("CVS"), None);
    }

    #[test]
    fn from_new_drops_blank_optionals() {
        let facility = Facility::from_new(FacilityId::from("f1"), sample());
        assert_eq!(facility.phone, None);
        assert_eq!(facility.hours.as_deref(), Some("Mon-Sun: 24 hours"));
        assert!(facility.coordinates().is_some());
    }

    #[test]
    fn serializes_with_camel_case_and_type_key() {
        let facility = Facility::from_new(FacilityId::from("f1"), sample());
        let json = serde_json::to_value(&facility).unwrap();
        assert_eq!(json["placeId"], "p1");
        assert_eq!(json["type"], "hospital");
        assert!(json["rating"].is_null());
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut facility = Facility::from_new(FacilityId::from("f1"), sample());
        facility.apply(FacilityUpdate {
            rating: Some(Some("4.9".to_string())),
            hours: Some(None),
            ..FacilityUpdate::default()
        });
        assert_eq!(facility.rating.as_deref(), Some("4.9"));
        assert_eq!(facility.hours, None);
        assert_eq!(facility.name, "Apollo Hospital");
    }

    #[test]
    fn distance_formatting() {
        assert_eq!(format_distance(0.84), "0.8 miles");
        assert_eq!(format_distance(3.26), "3.3 miles");
    }
}
