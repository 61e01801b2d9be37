//! Debounced user search.
//!
//! The controller is a plain state machine; the caller owns the clock and
//! the transport. Every keystroke returns a [`Ticket`] for the quiet
//! window it started. When that window elapses the caller hands the
//! ticket back to [`SearchController::settle`], which ignores it if a
//! newer keystroke happened meanwhile. A settled query that needs the
//! server yields a [`SearchKey`]; the response is applied through
//! [`SearchController::complete`] only while that key is still current,
//! so a slow answer for "al" can never overwrite the answer for "ali".
//!
//! Successful results are remembered per query text for
//! [`CACHE_FRESH_MS`]; settling on a query with a fresh entry shows it
//! at once and issues no key. Times are caller-supplied milliseconds.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{Paginated, UserSearchResult};

/// Quiet period after the last keystroke before a search is issued.
pub const DEBOUNCE_MS: u32 = 300;

/// Shortest (trimmed) text that triggers a search.
pub const MIN_QUERY_CHARS: usize = 2;

/// How long a successful result may be reused without refetching.
pub const CACHE_FRESH_MS: u64 = 30_000;

pub const HINT_TEXT: &str = "Type at least 2 characters to search";
pub const NO_RESULTS_TEXT: &str = "No users found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Identity of one issued search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKey {
    query: String,
    seq: u64,
}

impl SearchKey {
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchView<'a> {
    Hint,
    Searching,
    Failed(&'a str),
    NoResults,
    Results(&'a [UserSearchResult]),
}

#[derive(Debug, Clone)]
struct CachedResults {
    results: Paginated<UserSearchResult>,
    stored_at_ms: u64,
}

impl CachedResults {
    fn is_fresh(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.stored_at_ms) < CACHE_FRESH_MS
    }
}

#[derive(Debug)]
pub struct SearchController {
    raw: String,
    debounced: String,
    ticket: u64,
    seq: u64,
    in_flight: Option<SearchKey>,
    results: Paginated<UserSearchResult>,
    error: Option<String>,
    cache: HashMap<String, CachedResults>,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

pub fn meets_minimum(text: &str) -> bool {
    text.trim().chars().count() >= MIN_QUERY_CHARS
}

impl SearchController {
    pub fn new() -> Self {
        Self {
            raw: String::new(),
            debounced: String::new(),
            ticket: 0,
            seq: 0,
            in_flight: None,
            results: Paginated::no_search(),
            error: None,
            cache: HashMap::new(),
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw
    }

    pub fn debounced_text(&self) -> &str {
        &self.debounced
    }

    pub fn results(&self) -> &Paginated<UserSearchResult> {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Records a keystroke and restarts the quiet window.
    pub fn input(&mut self, text: impl Into<String>) -> Ticket {
        self.raw = text.into();
        self.ticket += 1;
        Ticket(self.ticket)
    }

    /// Commits the raw text once its quiet window has elapsed.
    ///
    /// Returns the key to fetch, or `None` when the ticket is outdated,
    /// nothing changed, the text is too short to search (the results then
    /// fall back to the empty envelope) or a fresh cached result was shown.
    pub fn settle(&mut self, ticket: Ticket, now_ms: u64) -> Option<SearchKey> {
        if ticket.0 != self.ticket || self.raw == self.debounced {
            return None;
        }
        self.debounced = self.raw.clone();

        if !meets_minimum(&self.debounced) {
            self.in_flight = None;
            self.results = Paginated::no_search();
            self.error = None;
            return None;
        }

        if let Some(cached) = self.cache.get(&self.debounced).filter(|c| c.is_fresh(now_ms)) {
            debug!(query = %self.debounced, "serving cached search results");
            self.results = cached.results.clone();
            self.in_flight = None;
            self.error = None;
            return None;
        }

        self.seq += 1;
        self.error = None;
        let key = SearchKey {
            query: self.debounced.clone(),
            seq: self.seq,
        };
        self.in_flight = Some(key.clone());
        Some(key)
    }

    /// Applies a finished search. Returns `false` when the key is no
    /// longer current and the outcome was dropped.
    pub fn complete(
        &mut self,
        key: &SearchKey,
        outcome: Result<Paginated<UserSearchResult>, String>,
        now_ms: u64,
    ) -> bool {
        if self.in_flight.as_ref() != Some(key) {
            debug!(query = %key.query, seq = key.seq, "discarding stale search response");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(results) => {
                self.cache.retain(|_, cached| cached.is_fresh(now_ms));
                self.cache.insert(
                    key.query.clone(),
                    CachedResults {
                        results: results.clone(),
                        stored_at_ms: now_ms,
                    },
                );
                self.results = results;
                self.error = None;
            }
            Err(message) => {
                self.results = Paginated::no_search();
                self.error = Some(message);
            }
        }
        true
    }

    /// A result was picked: forget the text and any pending search.
    pub fn select(&mut self) {
        self.raw.clear();
        self.debounced.clear();
        self.ticket += 1;
        self.in_flight = None;
        self.results = Paginated::no_search();
        self.error = None;
    }

    pub fn is_searching(&self) -> bool {
        meets_minimum(&self.raw)
            && (self.raw != self.debounced || self.in_flight.is_some())
            && self.error.is_none()
    }

    pub fn view(&self) -> SearchView<'_> {
        if !meets_minimum(&self.raw) {
            SearchView::Hint
        } else if self.is_searching() {
            SearchView::Searching
        } else if let Some(message) = &self.error {
            SearchView::Failed(message)
        } else if self.results.items.is_empty() {
            SearchView::NoResults
        } else {
            SearchView::Results(&self.results.items)
        }
    }
}
