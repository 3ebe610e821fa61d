use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use healthfinder::config::{Config, PlacesProvider};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const SEARCH_FAILED: &str =
    "Failed to search facilities. Please check your connection and try again.";

fn catalog_config() -> Config {
    let mut config = Config::default();
    config.places.provider = PlacesProvider::Catalog;
    config
}

fn spawn_app_with(config: Config) -> Router {
    let state = healthfinder::api::create_app_state_from_config(config, None)
        .expect("Failed to create app state");
    healthfinder::api::router(state)
}

fn spawn_app() -> Router {
    spawn_app_with(catalog_config())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

async fn post_json(app: &Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_search_requires_query() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/search-facilities").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Search query is required");

    let (status, body) = get(&app, "/api/search-facilities?query=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_search_cvs_returns_single_pharmacy() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/search-facilities?query=CVS").await;
    assert_eq!(status, StatusCode::OK);

    let facilities = body["facilities"].as_array().unwrap();
    assert_eq!(facilities.len(), 1);
    assert_eq!(facilities[0]["name"], "CVS Pharmacy");
    assert_eq!(facilities[0]["type"], "pharmacy");
    assert!(
        facilities[0]["address"]
            .as_str()
            .unwrap()
            .contains("Health Ave")
    );
    assert!(facilities[0]["placeId"].is_string());
    assert!(facilities[0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_search_results_are_capped_and_typed() {
    let app = spawn_app();

    // Every catalog address is in NY.
    let (status, body) = get(&app, "/api/search-facilities?query=ny").await;
    assert_eq!(status, StatusCode::OK);

    let facilities = body["facilities"].as_array().unwrap();
    assert_eq!(facilities.len(), 10);
    for facility in facilities {
        let kind = facility["type"].as_str().unwrap();
        assert!(["hospital", "pharmacy", "clinic"].contains(&kind));
    }
}

#[tokio::test]
async fn test_repeated_search_reuses_ids() {
    let app = spawn_app();

    let (_, first) = get(&app, "/api/search-facilities?query=Apollo").await;
    let (_, second) = get(&app, "/api/search-facilities?query=apollo").await;

    assert_eq!(first["facilities"][0]["id"], second["facilities"][0]["id"]);
}

#[tokio::test]
async fn test_search_ignores_unparseable_location() {
    let app = spawn_app();

    let (status, body) =
        get(&app, "/api/search-facilities?query=cvs&location=New%20York").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["facilities"].as_array().unwrap().len(), 1);

    let (status, _) = get(&app, "/api/search-facilities?query=cvs&location=40.7,-74.0").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_history_round_trip_most_recent_first() {
    let app = spawn_app();

    let (_, found) = get(&app, "/api/search-facilities?query=CVS").await;
    let facility_id = found["facilities"][0]["id"].as_str().unwrap().to_string();

    let (status, saved) = post_json(
        &app,
        "/api/search-history",
        json!({ "facilityId": facility_id, "searchQuery": "cvs" }).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["search"]["searchQuery"], "cvs");
    assert_eq!(saved["search"]["userId"], Value::Null);

    let (status, _) = post_json(
        &app,
        "/api/search-history",
        json!({ "searchQuery": "second" }).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/api/search-history").await;
    assert_eq!(status, StatusCode::OK);

    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["searchQuery"], "second");
    assert_eq!(history[0]["facility"], Value::Null);
    assert_eq!(history[1]["searchQuery"], "cvs");
    assert_eq!(history[1]["facility"]["name"], "CVS Pharmacy");
}

#[tokio::test]
async fn test_history_is_capped_at_ten() {
    let app = spawn_app();

    for i in 0..15 {
        let (status, _) = post_json(
            &app,
            "/api/search-history",
            json!({ "searchQuery": format!("query {i}") }).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = get(&app, "/api/search-history").await;
    let queries: Vec<&str> = body["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["searchQuery"].as_str().unwrap())
        .collect();

    let expected: Vec<String> = (5..15).rev().map(|i| format!("query {i}")).collect();
    assert_eq!(queries, expected);
}

#[tokio::test]
async fn test_history_filters_by_user() {
    let app = spawn_app();

    post_json(
        &app,
        "/api/search-history",
        json!({ "userId": "u1", "searchQuery": "mine" }).to_string(),
    )
    .await;
    post_json(
        &app,
        "/api/search-history",
        json!({ "userId": "u2", "searchQuery": "theirs" }).to_string(),
    )
    .await;

    let (_, body) = get(&app, "/api/search-history?userId=u1").await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["searchQuery"], "mine");
}

#[tokio::test]
async fn test_history_accepts_dangling_facility() {
    let app = spawn_app();

    let (status, _) = post_json(
        &app,
        "/api/search-history",
        json!({ "facilityId": "does-not-exist", "searchQuery": "ghost" }).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/api/search-history").await;
    assert_eq!(body["history"][0]["facilityId"], "does-not-exist");
    assert_eq!(body["history"][0]["facility"], Value::Null);
}

#[tokio::test]
async fn test_history_post_validation_failures() {
    let app = spawn_app();

    let (status, body) = post_json(
        &app,
        "/api/search-history",
        json!({ "facilityId": "x" }).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to save search history");

    let (status, body) = post_json(&app, "/api/search-history", "{not json".to_string()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to save search history");
}

#[tokio::test]
async fn test_google_without_key_is_configuration_error() {
    let mut config = Config::default();
    config.places.provider = PlacesProvider::Google;
    config.places.api_key = None;
    let app = spawn_app_with(config);

    let (status, body) = get(&app, "/api/search-facilities?query=cvs").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert_ne!(message, SEARCH_FAILED);
    assert!(message.contains("not configured"));
}

#[tokio::test]
async fn test_health_and_metrics() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider"], "catalog");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
