//! Debounced search box state machine.
//!
//! Every transition takes the current [`Instant`] explicitly, so the machine
//! has no timers of its own. A driver calls [`SearchBox::poll`] once the
//! deadline from [`SearchBox::debounce_deadline`] passes, performs the
//! returned [`SearchRequest`], and hands the outcome back through
//! [`SearchBox::apply_response`] together with the query it was made for.

use std::time::{Duration, Instant};

use super::debounce::Debouncer;
use crate::constants::{intervals, limits, maps};
use crate::models::Facility;
use crate::services::HistoryRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    /// Input is shorter than the minimum query length.
    Typing,
    /// Waiting for the debounce timer.
    Pending,
    /// A request for the active query is in flight.
    Loading,
    ShowingResults,
    NoResults,
    Error,
}

/// A search the driver should send to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct SearchBox {
    text: String,
    debouncer: Debouncer<String>,
    /// Debounced query the shown results belong to.
    active_query: Option<String>,
    state: SearchState,
    results: Vec<Facility>,
    error: Option<String>,
    selection: Option<Facility>,
    min_query_len: usize,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new(intervals::SEARCH_DEBOUNCE, limits::MIN_QUERY_LEN)
    }
}

impl SearchBox {
    #[must_use]
    pub const fn new(debounce: Duration, min_query_len: usize) -> Self {
        Self {
            text: String::new(),
            debouncer: Debouncer::new(debounce),
            active_query: None,
            state: SearchState::Idle,
            results: Vec::new(),
            error: None,
            selection: None,
            min_query_len,
        }
    }

    fn is_searchable(&self, query: &str) -> bool {
        query.chars().count() >= self.min_query_len
    }

    /// Replaces the input text and restarts the debounce timer.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.text = text.into();
        let trimmed = self.text.trim().to_string();

        self.state = if self.is_searchable(&trimmed) {
            SearchState::Pending
        } else {
            SearchState::Typing
        };
        self.debouncer.schedule(trimmed, now);
    }

    /// Fires the debounce timer if it is due.
    ///
    /// Returns the request to send when the debounced query is long enough.
    /// A short debounced query hides the dropdown instead.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        let query = self.debouncer.fire_if_due(now)?;

        if !self.is_searchable(&query) {
            self.active_query = None;
            self.results.clear();
            self.error = None;
            self.state = SearchState::Typing;
            return None;
        }

        self.active_query = Some(query.clone());
        self.error = None;
        self.state = SearchState::Loading;
        Some(SearchRequest { query })
    }

    /// Applies a backend response made for `query`.
    ///
    /// Returns `false` and leaves the box untouched when `query` is no longer
    /// the active debounced query.
    pub fn apply_response(&mut self, query: &str, response: Result<Vec<Facility>, String>) -> bool {
        if self.active_query.as_deref() != Some(query) {
            return false;
        }

        let next = match response {
            Ok(facilities) => {
                self.error = None;
                self.results = facilities;
                if self.results.is_empty() {
                    SearchState::NoResults
                } else {
                    SearchState::ShowingResults
                }
            }
            Err(message) => {
                self.results.clear();
                self.error = Some(message);
                SearchState::Error
            }
        };

        // Typing during the request keeps the newer state.
        if self.state == SearchState::Loading {
            self.state = next;
        }
        true
    }

    /// Selects the result at `index`.
    ///
    /// The facility name replaces the input and the dropdown closes. The
    /// returned request records the text as typed before the selection.
    pub fn select(&mut self, index: usize) -> Option<HistoryRequest> {
        let facility = self.results.get(index)?.clone();
        let typed = std::mem::replace(&mut self.text, facility.name.clone());

        self.debouncer.cancel();
        self.active_query = None;
        self.results.clear();
        self.error = None;
        self.state = SearchState::Idle;

        let request = HistoryRequest {
            user_id: None,
            facility_id: Some(facility.id.clone()),
            search_query: Some(typed),
        };
        self.selection = Some(facility);
        Some(request)
    }

    /// Resets text, selection and debounced query together.
    pub fn clear(&mut self) {
        self.text.clear();
        self.debouncer.cancel();
        self.active_query = None;
        self.results.clear();
        self.error = None;
        self.selection = None;
        self.state = SearchState::Idle;
    }

    #[must_use]
    pub fn directions_url(&self) -> Option<String> {
        self.selection.as_ref().map(directions_url)
    }

    /// Local acknowledgment for saving the selected facility.
    #[must_use]
    pub fn save(&self) -> Option<String> {
        self.selection
            .as_ref()
            .map(|f| format!("{} has been saved to your locations.", f.name))
    }

    #[must_use]
    pub const fn state(&self) -> SearchState {
        self.state
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn active_query(&self) -> Option<&str> {
        self.active_query.as_deref()
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Facility> {
        self.selection.as_ref()
    }

    #[must_use]
    pub fn results(&self) -> &[Facility] {
        &self.results
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    #[must_use]
    pub const fn dropdown_visible(&self) -> bool {
        matches!(
            self.state,
            SearchState::Loading
                | SearchState::ShowingResults
                | SearchState::NoResults
                | SearchState::Error
        )
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, SearchState::Loading)
    }
}

/// Maps link for a facility: coordinates when both are known, otherwise an
/// address search.
#[must_use]
pub fn directions_url(facility: &Facility) -> String {
    match (&facility.latitude, &facility.longitude) {
        (Some(lat), Some(lng)) => format!("{}{lat},{lng}", maps::DIRECTIONS_URL),
        _ => format!(
            "{}{}",
            maps::SEARCH_URL,
            urlencoding::encode(&facility.address)
        ),
    }
}
