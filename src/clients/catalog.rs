use async_trait::async_trait;

use super::{FacilityLookup, LookupError, LookupQuery};
use crate::models::{FacilityType, NewFacility};

struct CatalogEntry {
    place_id: &'static str,
    name: &'static str,
    facility_type: FacilityType,
    address: &'static str,
    phone: &'static str,
    hours: &'static str,
    rating: &'static str,
    distance: &'static str,
    latitude: &'static str,
    longitude: &'static str,
}

impl CatalogEntry {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.facility_type.as_str().contains(needle)
            || self.address.to_lowercase().contains(needle)
    }

    fn to_new_facility(&self) -> NewFacility {
        NewFacility {
            place_id: self.place_id.to_string(),
            name: self.name.to_string(),
            facility_type: self.facility_type,
            address: self.address.to_string(),
            phone: Some(self.phone.to_string()),
            hours: Some(self.hours.to_string()),
            rating: Some(self.rating.to_string()),
            distance: Some(self.distance.to_string()),
            latitude: Some(self.latitude.to_string()),
            longitude: Some(self.longitude.to_string()),
        }
    }
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        place_id: "mock_apollo_1",
        name: "Apollo Hospital",
        facility_type: FacilityType::Hospital,
        address: "320 Fortis Blvd, Downtown Medical District, NY 10001",
        phone: "+1 (555) 123-4567",
        hours: "Mon-Sun: 24 hours",
        rating: "4.5",
        distance: "0.8 miles",
        latitude: "40.7128",
        longitude: "-74.0060",
    },
    CatalogEntry {
        place_id: "mock_cvs_1",
        name: "CVS Pharmacy",
        facility_type: FacilityType::Pharmacy,
        address: "150 Health Ave, Medical Plaza, NY 10002",
        phone: "+1 (555) 234-5678",
        hours: "Mon-Fri: 8AM-10PM, Sat-Sun: 9AM-9PM",
        rating: "4.2",
        distance: "0.5 miles",
        latitude: "40.7589",
        longitude: "-73.9851",
    },
    CatalogEntry {
        place_id: "mock_wellness_1",
        name: "Wellness Medical Clinic",
        facility_type: FacilityType::Clinic,
        address: "45 Care Street, Healthcare Center, NY 10003",
        phone: "+1 (555) 345-6789",
        hours: "Mon-Fri: 7AM-8PM, Sat: 8AM-5PM",
        rating: "4.7",
        distance: "1.2 miles",
        latitude: "40.7282",
        longitude: "-73.9942",
    },
    CatalogEntry {
        place_id: "mock_walgreens_1",
        name: "Walgreens Pharmacy",
        facility_type: FacilityType::Pharmacy,
        address: "89 Prescription Way, Pharmacy District, NY 10004",
        phone: "+1 (555) 456-7890",
        hours: "Mon-Sun: 7AM-11PM",
        rating: "4.1",
        distance: "1.5 miles",
        latitude: "40.7505",
        longitude: "-73.9934",
    },
    CatalogEntry {
        place_id: "mock_mercy_1",
        name: "Mercy General Hospital",
        facility_type: FacilityType::Hospital,
        address: "200 Emergency Lane, Hospital Quarter, NY 10005",
        phone: "+1 (555) 567-8901",
        hours: "Mon-Sun: 24 hours",
        rating: "4.3",
        distance: "2.1 miles",
        latitude: "40.7416",
        longitude: "-74.0032",
    },
    CatalogEntry {
        place_id: "mock_family_1",
        name: "Family Health Clinic",
        facility_type: FacilityType::Clinic,
        address: "78 Community Road, Family Care Center, NY 10006",
        phone: "+1 (555) 678-9012",
        hours: "Mon-Fri: 8AM-6PM, Sat: 9AM-3PM",
        rating: "4.6",
        distance: "1.8 miles",
        latitude: "40.7348",
        longitude: "-73.9903",
    },
    CatalogEntry {
        place_id: "mock_rite_aid_1",
        name: "Rite Aid Pharmacy",
        facility_type: FacilityType::Pharmacy,
        address: "123 Medicine Street, Pharmacy Row, NY 10007",
        phone: "+1 (555) 789-0123",
        hours: "Mon-Fri: 8AM-9PM, Sat-Sun: 9AM-7PM",
        rating: "4.0",
        distance: "2.3 miles",
        latitude: "40.7580",
        longitude: "-73.9855",
    },
    CatalogEntry {
        place_id: "mock_urgent_1",
        name: "Urgent Care Plus",
        facility_type: FacilityType::Clinic,
        address: "56 Quick Care Ave, Urgent Medical Plaza, NY 10008",
        phone: "+1 (555) 890-1234",
        hours: "Mon-Sun: 7AM-10PM",
        rating: "4.4",
        distance: "1.0 miles",
        latitude: "40.7614",
        longitude: "-73.9776",
    },
    CatalogEntry {
        place_id: "mock_mount_1",
        name: "Mount Sinai Medical Center",
        facility_type: FacilityType::Hospital,
        address: "1468 Madison Avenue, Upper East Side, NY 10029",
        phone: "+1 (555) 901-2345",
        hours: "Mon-Sun: 24 hours",
        rating: "4.8",
        distance: "3.2 miles",
        latitude: "40.7891",
        longitude: "-73.9482",
    },
    CatalogEntry {
        place_id: "mock_duane_1",
        name: "Duane Reade Pharmacy",
        facility_type: FacilityType::Pharmacy,
        address: "Broadway & 72nd Street, Upper West Side, NY 10023",
        phone: "+1 (555) 012-3456",
        hours: "Mon-Sun: 24 hours",
        rating: "3.9",
        distance: "2.8 miles",
        latitude: "40.7782",
        longitude: "-73.9826",
    },
];

/// Fixed in-process catalog, selected with `provider = "catalog"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCatalog;

impl LocalCatalog {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Case-insensitive substring match over name, category and address.
    #[must_use]
    pub fn search(&self, text: &str, limit: usize) -> Vec<NewFacility> {
        let needle = text.trim().to_lowercase();
        CATALOG
            .iter()
            .filter(|entry| entry.matches(&needle))
            .take(limit)
            .map(CatalogEntry::to_new_facility)
            .collect()
    }
}

#[async_trait]
impl FacilityLookup for LocalCatalog {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn lookup(&self, query: &LookupQuery) -> Result<Vec<NewFacility>, LookupError> {
        Ok(self.search(&query.text, query.limit))
    }
}
