use tracing::debug;

use super::ApiError;
use crate::constants::messages;
use crate::domain::Coordinates;

pub fn validate_search_query(query: Option<&str>) -> Result<&str, ApiError> {
    let trimmed = query.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(ApiError::invalid_input(messages::QUERY_REQUIRED));
    }
    Ok(trimmed)
}

/// Reads the optional `location` parameter as a `lat,lng` bias. Anything
/// else is ignored and the search runs unbiased.
pub fn parse_location(location: Option<&str>) -> Option<Coordinates> {
    match location.map(str::trim) {
        None | Some("") => None,
        Some(raw) => raw
            .parse()
            .inspect_err(|e| debug!(location = raw, "Ignoring location bias: {e}"))
            .ok(),
    }
}
