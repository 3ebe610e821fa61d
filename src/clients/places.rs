use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::{FacilityLookup, LookupError, LookupQuery};
use crate::config::PlacesConfig;
use crate::constants::places::{DETAIL_CONCURRENCY, DETAIL_FIELDS};
use crate::domain::Coordinates;
use crate::models::{FacilityType, NewFacility, format_distance};

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceSummary>,
    error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct PlaceSummary {
    place_id: String,
    name: Option<String>,
    formatted_address: Option<String>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<PlaceDetails>,
    error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceDetails {
    name: Option<String>,
    formatted_address: Option<String>,
    formatted_phone_number: Option<String>,
    opening_hours: Option<OpeningHours>,
    rating: Option<f64>,
    #[serde(default)]
    types: Vec<String>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    #[serde(default)]
    weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Statuses that carry a usable (possibly empty) result.
fn is_ok_status(status: &str) -> bool {
    matches!(status, "OK" | "ZERO_RESULTS")
}

/// Statuses that concern one place only. Anything else on a details call
/// means the provider itself refused.
fn is_place_miss(status: &str, has_result: bool) -> bool {
    status == "NOT_FOUND" || (status == "ZERO_RESULTS" && !has_result)
}

/// Client for the Google Places web service.
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    radius_meters: u32,
}

impl PlacesClient {
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            radius_meters: 5000,
        }
    }

    pub fn from_config(config: &PlacesConfig, client: Client) -> anyhow::Result<Self> {
        Url::parse(&config.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid places base_url '{}': {e}", config.base_url))?;

        Ok(Self {
            radius_meters: config.search_radius_meters,
            ..Self::new(
                client,
                config.base_url.clone(),
                config.credential().map(str::to_string),
            )
        })
    }

    fn api_key(&self) -> Result<&str, LookupError> {
        self.api_key.as_deref().ok_or_else(|| {
            LookupError::Configuration(format!(
                "no API key set; export {} or set [places] api_key",
                crate::config::PLACES_API_KEY_ENV
            ))
        })
    }

    fn text_search_url(&self, key: &str, query: &LookupQuery) -> Result<Url, LookupError> {
        let mut params: Vec<(&str, String)> = vec![
            ("query", query.text.clone()),
            ("key", key.to_string()),
        ];

        if let Some(kind) = FacilityType::from_query_hint(&query.text) {
            params.push(("type", kind.provider_type().to_string()));
        }

        if let Some(location) = query.location {
            params.push(("location", location.to_string()));
            params.push(("radius", self.radius_meters.to_string()));
        }

        Url::parse_with_params(&format!("{}/textsearch/json", self.base_url), &params)
            .map_err(|e| LookupError::Configuration(format!("invalid base_url: {e}")))
    }

    fn details_url(&self, key: &str, place_id: &str) -> Result<Url, LookupError> {
        Url::parse_with_params(
            &format!("{}/details/json", self.base_url),
            &[("place_id", place_id), ("fields", DETAIL_FIELDS), ("key", key)],
        )
        .map_err(|e| LookupError::Configuration(format!("invalid base_url: {e}")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        endpoint: &'static str,
    ) -> Result<T, LookupError> {
        let response = self.client.get(url).send().await.inspect_err(|_| {
            metrics::counter!("places_requests_total", "endpoint" => endpoint, "outcome" => "transport_error")
                .increment(1);
        })?;

        if !response.status().is_success() {
            metrics::counter!("places_requests_total", "endpoint" => endpoint, "outcome" => "http_error")
                .increment(1);
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Upstream {
                status: status.to_string(),
                message: body,
            });
        }

        metrics::counter!("places_requests_total", "endpoint" => endpoint, "outcome" => "ok")
            .increment(1);
        Ok(response.json().await?)
    }

    async fn text_search(
        &self,
        key: &str,
        query: &LookupQuery,
    ) -> Result<Vec<PlaceSummary>, LookupError> {
        let url = self.text_search_url(key, query)?;
        let response: TextSearchResponse = self.get_json(url, "textsearch").await?;

        if !is_ok_status(&response.status) {
            return Err(LookupError::Upstream {
                status: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }

        Ok(response.results)
    }

    /// Fetches details for one place. `Ok(None)` when the provider no
    /// longer knows the place.
    async fn details(
        &self,
        key: &str,
        place_id: &str,
    ) -> Result<Option<PlaceDetails>, LookupError> {
        let url = self.details_url(key, place_id)?;
        let response: DetailsResponse = self.get_json(url, "details").await?;

        if is_place_miss(&response.status, response.result.is_some()) {
            return Ok(None);
        }

        if !is_ok_status(&response.status) {
            return Err(LookupError::Upstream {
                status: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }

        Ok(Some(response.result.unwrap_or_default()))
    }
}

#[async_trait]
impl FacilityLookup for PlacesClient {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn lookup(&self, query: &LookupQuery) -> Result<Vec<NewFacility>, LookupError> {
        let key = self.api_key()?;

        let mut summaries = self.text_search(key, query).await?;
        summaries.truncate(query.limit);
        debug!(
            query = %query.text,
            count = summaries.len(),
            "Places text search returned"
        );

        // `buffered` keeps provider ranking order.
        let facilities: Vec<NewFacility> = stream::iter(summaries)
            .map(|summary| async move {
                let details = self.details(key, &summary.place_id).await?;
                if details.is_none() {
                    warn!(place_id = %summary.place_id, "Skipping place, provider has no details");
                }
                Ok::<_, LookupError>(details.map(|d| normalize(summary, d, query.location)))
            })
            .buffered(DETAIL_CONCURRENCY)
            .try_filter_map(|f| async move { Ok(f) })
            .try_collect()
            .await?;

        Ok(facilities)
    }
}

/// Merges a search summary with its details into the facility shape.
fn normalize(
    summary: PlaceSummary,
    details: PlaceDetails,
    origin: Option<Coordinates>,
) -> NewFacility {
    let types = if details.types.is_empty() {
        summary.types
    } else {
        details.types
    };

    let coordinates = details
        .geometry
        .map(|g| Coordinates::new(g.location.lat, g.location.lng));

    let distance = origin
        .zip(coordinates)
        .map(|(from, to)| format_distance(from.distance_miles(&to)));

    let hours = details
        .opening_hours
        .map(|h| h.weekday_text.join(", "))
        .filter(|h| !h.is_empty());

    NewFacility {
        place_id: summary.place_id,
        name: details
            .name
            .or(summary.name)
            .unwrap_or_else(|| "Unnamed facility".to_string()),
        facility_type: FacilityType::from_place_types(&types),
        address: details
            .formatted_address
            .or(summary.formatted_address)
            .unwrap_or_default(),
        phone: details.formatted_phone_number,
        hours,
        rating: details.rating.map(|r| format!("{r:.1}")),
        distance,
        latitude: coordinates.map(|c| c.latitude.to_string()),
        longitude: coordinates.map(|c| c.longitude.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(key: Option<&str>) -> PlacesClient {
        PlacesClient::new(
            Client::new(),
            "https://maps.example.com/api/place/",
            key.map(str::to_string),
        )
    }

    fn query(text: &str, location: Option<Coordinates>) -> LookupQuery {
        LookupQuery {
            text: text.to_string(),
            location,
            limit: 10,
        }
    }

    #[tokio::test]
    async fn missing_key_is_configuration_error() {
        let err = client(None)
            .lookup(&query("cvs", None))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Configuration(_)));
    }

    #[test]
    fn text_search_url_carries_type_and_location() {
        let c = client(Some("k"));
        let url = c
            .text_search_url(
                "k",
                &query("city hospital", Some(Coordinates::new(40.7, -74.0))),
            )
            .unwrap();

        assert_eq!(url.path(), "/api/place/textsearch/json");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("query".to_string(), "city hospital".to_string())));
        assert!(pairs.contains(&("type".to_string(), "hospital".to_string())));
        assert!(pairs.contains(&("location".to_string(), "40.7,-74".to_string())));
        assert!(pairs.contains(&("radius".to_string(), "5000".to_string())));
    }

    #[test]
    fn details_url_requests_fields() {
        let url = client(Some("k")).details_url("k", "abc").unwrap();
        let fields = url
            .query_pairs()
            .find(|(k, _)| k == "fields")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert!(fields.contains("formatted_phone_number"));
        assert!(fields.contains("geometry"));
    }

    #[test]
    fn normalize_prefers_details_and_computes_distance() {
        let summary = PlaceSummary {
            place_id: "p1".to_string(),
            name: Some("Summary Name".to_string()),
            formatted_address: Some("1 Summary St".to_string()),
            types: vec!["health".to_string()],
        };
        let details: PlaceDetails = serde_json::from_value(serde_json::json!({
            "name": "CVS Pharmacy",
            "formatted_address": "150 Health Ave",
            "formatted_phone_number": "(555) 234-5678",
            "opening_hours": { "weekday_text": ["Monday: 8AM-10PM", "Tuesday: 8AM-10PM"] },
            "rating": 4.2,
            "types": ["pharmacy", "store", "health"],
            "geometry": { "location": { "lat": 40.7589, "lng": -73.9851 } }
        }))
        .unwrap();

        let facility = normalize(summary, details, Some(Coordinates::new(40.7589, -73.9851)));

        assert_eq!(facility.name, "CVS Pharmacy");
        assert_eq!(facility.address, "150 Health Ave");
        assert_eq!(facility.facility_type, FacilityType::Pharmacy);
        assert_eq!(
            facility.hours.as_deref(),
            Some("Monday: 8AM-10PM, Tuesday: 8AM-10PM")
        );
        assert_eq!(facility.rating.as_deref(), Some("4.2"));
        assert_eq!(facility.distance.as_deref(), Some("0.0 miles"));
        assert_eq!(facility.latitude.as_deref(), Some("40.7589"));
    }

    #[test]
    fn normalize_falls_back_to_summary() {
        let summary = PlaceSummary {
            place_id: "p2".to_string(),
            name: Some("Mercy General".to_string()),
            formatted_address: Some("200 Emergency Lane".to_string()),
            types: vec!["hospital".to_string()],
        };

        let facility = normalize(summary, PlaceDetails::default(), None);
        assert_eq!(facility.name, "Mercy General");
        assert_eq!(facility.facility_type, FacilityType::Hospital);
        assert_eq!(facility.distance, None);
        assert_eq!(facility.latitude, None);
    }

    #[test]
    fn ok_statuses() {
        assert!(is_ok_status("OK"));
        assert!(is_ok_status("ZERO_RESULTS"));
        assert!(!is_ok_status("REQUEST_DENIED"));
        assert!(!is_ok_status("OVER_QUERY_LIMIT"));
    }

    #[test]
    fn only_per_place_statuses_are_skippable() {
        assert!(is_place_miss("NOT_FOUND", false));
        assert!(is_place_miss("ZERO_RESULTS", false));
        assert!(!is_place_miss("ZERO_RESULTS", true));
        assert!(!is_place_miss("OK", false));
        assert!(!is_place_miss("OVER_QUERY_LIMIT", false));
        assert!(!is_place_miss("REQUEST_DENIED", false));
        assert!(!is_place_miss("INVALID_REQUEST", false));
    }
}
