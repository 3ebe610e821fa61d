pub mod limits {

    pub const MAX_SEARCH_RESULTS: usize = 10;

    pub const HISTORY_PAGE_SIZE: usize = 10;

    pub const MIN_QUERY_LEN: usize = 2;
}

pub mod intervals {
    use std::time::Duration;

    pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
}

pub mod places {

    pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

    pub const DETAIL_FIELDS: &str =
        "name,formatted_address,formatted_phone_number,opening_hours,rating,types,geometry";

    /// Concurrent detail fetches per search.
    pub const DETAIL_CONCURRENCY: usize = 4;
}

pub mod maps {

    pub const DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/?api=1&destination=";

    pub const SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";
}

pub mod messages {

    pub const SEARCH_FAILED: &str =
        "Failed to search facilities. Please check your connection and try again.";

    pub const QUERY_REQUIRED: &str = "Search query is required";

    pub const HISTORY_FETCH_FAILED: &str = "Failed to fetch search history";

    pub const HISTORY_SAVE_FAILED: &str = "Failed to save search history";
}
