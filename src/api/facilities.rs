use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::validation::{parse_location, validate_search_query};
use super::{ApiError, AppState, FacilitiesResponse, SearchParams};

/// `GET /api/search-facilities?query=..&location=lat,lng`
pub async fn search_facilities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<FacilitiesResponse>, ApiError> {
    let query = validate_search_query(params.query.as_deref())?;
    let location = parse_location(params.location.as_deref());

    let facilities = state
        .directory()
        .search_facilities(Some(query), location)
        .await?;

    Ok(Json(FacilitiesResponse { facilities }))
}
