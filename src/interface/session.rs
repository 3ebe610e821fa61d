use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until, timeout_at};
use tracing::{debug, warn};

use super::client::FacilityApi;
use super::search_box::{SearchBox, SearchRequest};
use crate::constants::messages;
use crate::models::Facility;

type SearchOutcome = (String, Result<Vec<Facility>, String>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The debounce fired and a request went out.
    Searching(String),
    /// The debounce fired on a query too short to search.
    Skipped,
    /// A response arrived; `applied` is false when it was stale.
    Response { query: String, applied: bool },
}

/// Runs a [`SearchBox`] against a [`FacilityApi`] on the tokio clock.
///
/// Searches run as spawned tasks and report back over a channel. They are
/// never cancelled; stale responses are dropped by the search box. History
/// writes are spawned too and can be awaited with [`Self::flush_history`].
pub struct SearchSession {
    search_box: SearchBox,
    api: Arc<dyn FacilityApi>,
    outcomes_tx: mpsc::UnboundedSender<SearchOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<SearchOutcome>,
    in_flight: usize,
    history_writes: Vec<JoinHandle<()>>,
}

impl SearchSession {
    #[must_use]
    pub fn new(api: Arc<dyn FacilityApi>, debounce: Duration, min_query_len: usize) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            search_box: SearchBox::new(debounce, min_query_len),
            api,
            outcomes_tx,
            outcomes_rx,
            in_flight: 0,
            history_writes: Vec::new(),
        }
    }

    #[must_use]
    pub const fn search_box(&self) -> &SearchBox {
        &self.search_box
    }

    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn input(&mut self, text: impl Into<String>) {
        self.search_box.input(text, Instant::now().into_std());
    }

    pub fn clear(&mut self) {
        self.search_box.clear();
    }

    /// Selects a result and records it in history without waiting.
    pub fn select(&mut self, index: usize) -> Option<&Facility> {
        let request = self.search_box.select(index)?;

        let api = self.api.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = api.append_history(&request).await {
                warn!("Failed to record search history: {e}");
            }
        });
        self.history_writes.retain(|h| !h.is_finished());
        self.history_writes.push(handle);

        self.search_box.selection()
    }

    /// Waits up to `wait` for history writes still running. Returns how many
    /// were left unfinished.
    pub async fn flush_history(&mut self, wait: Duration) -> usize {
        let deadline = Instant::now() + wait;
        let mut unfinished = 0;
        for handle in self.history_writes.drain(..) {
            if timeout_at(deadline, handle).await.is_err() {
                unfinished += 1;
            }
        }

        if unfinished > 0 {
            warn!(unfinished, "Search history writes did not finish in time");
        }
        unfinished
    }

    fn dispatch(&mut self, request: SearchRequest) {
        self.in_flight += 1;

        let api = self.api.clone();
        let tx = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let SearchRequest { query } = request;
            let result = api.search(&query).await.map_err(|e| {
                warn!(query = %query, "Facility search failed: {e}");
                messages::SEARCH_FAILED.to_string()
            });
            // The receiver lives as long as the session.
            let _ = tx.send((query, result));
        });
    }

    /// Waits for the next timer or response and applies it.
    ///
    /// Returns `None` when nothing is pending.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        let deadline = self.search_box.debounce_deadline().map(Instant::from_std);
        if deadline.is_none() && self.in_flight == 0 {
            return None;
        }

        let timer = sleep_until(deadline.unwrap_or_else(Instant::now));

        tokio::select! {
            () = timer, if deadline.is_some() => {
                match self.search_box.poll(Instant::now().into_std()) {
                    Some(request) => {
                        let query = request.query.clone();
                        debug!(query = %query, "Debounce fired");
                        self.dispatch(request);
                        Some(SessionEvent::Searching(query))
                    }
                    None => Some(SessionEvent::Skipped),
                }
            }
            Some((query, result)) = self.outcomes_rx.recv(), if self.in_flight > 0 => {
                self.in_flight -= 1;
                let applied = self.search_box.apply_response(&query, result);
                if !applied {
                    debug!(query = %query, "Discarding stale search response");
                }
                Some(SessionEvent::Response { query, applied })
            }
        }
    }

    /// Drives the session until no timer or request is outstanding.
    pub async fn settle(&mut self) {
        while self.next_event().await.is_some() {}
    }
}
