use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::{ApiError, AppState, HistoryParams, HistoryResponse, SavedSearchResponse};
use crate::constants::messages;
use crate::services::HistoryRequest;

/// `GET /api/search-history`
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let user_id = params.user_id.as_deref().filter(|id| !id.trim().is_empty());

    let history = state
        .directory()
        .list_history(user_id)
        .await
        .map_err(|e| ApiError::failed(messages::HISTORY_FETCH_FAILED, e))?;

    Ok(Json(HistoryResponse { history }))
}

/// `POST /api/search-history`
///
/// A body that fails to parse is reported like any other validation
/// failure: a 500 with the save-failed message.
pub async fn append_history(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HistoryRequest>, JsonRejection>,
) -> Result<Json<SavedSearchResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::failed(messages::HISTORY_SAVE_FAILED, e.body_text()))?;

    let search = state.directory().append_history(request).await?;

    Ok(Json(SavedSearchResponse { search }))
}
