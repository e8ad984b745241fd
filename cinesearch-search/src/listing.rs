//! Search listing view-state.
//!
//! `SearchState` is a small state machine:
//!
//! ```text
//! Idle --submit--> Searching --results--> ResultsReady --page--> Searching
//!                      |                                            |
//!                      +--empty or failed--> NoResults <------------+
//! any state --return_home--> Idle
//! ```
//!
//! Every fetch the machine asks for is described by a [`SearchRequest`]
//! carrying a generation number. Responses are applied only while their
//! generation is current, so a slow response for an abandoned query or page
//! can never overwrite what is on screen.

use std::str::FromStr;

use cinesearch_core::movie::total_pages;
use cinesearch_core::{MovieSummary, SearchHistory, SearchPage, ValidationError};

use crate::errors::MovieSearchError;
use crate::providers::MovieCatalog;

/// Phase of the search listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// No query submitted
    #[default]
    Idle,
    /// A page has been requested and its results are pending
    Searching,
    /// The current page has at least one result
    ResultsReady,
    /// The current page is empty, or the fetch failed
    NoResults,
}

/// A fetch the state machine is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    generation: u64,
    /// Query text to search for
    pub query: String,
    /// 1-based page number
    pub page: u32,
}

impl SearchRequest {
    /// Sequence number identifying this request within its state machine.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Page navigation derived from the current listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page, 1-based
    pub page: u32,
    /// Number of pages available
    pub total_pages: u32,
    /// Whether "previous" is enabled
    pub has_previous: bool,
    /// Whether "next" is enabled
    pub has_next: bool,
}

/// Query, page and results of the search listing.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    page: u32,
    total_count: u32,
    results: Vec<MovieSummary>,
    phase: SearchPhase,
    generation: u64,
    last_error: Option<String>,
}

impl SearchState {
    /// Creates an idle listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Submitted query text; empty while idle.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current page number; 0 while idle.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Total hits reported for the query.
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Results of the current page.
    pub fn results(&self) -> &[MovieSummary] {
        &self.results
    }

    /// Message of the fetch failure that produced `NoResults`, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of pages for the reported total.
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count)
    }

    /// Navigation controls, available only while results are shown.
    pub fn pagination(&self) -> Option<Pagination> {
        if self.phase != SearchPhase::ResultsReady {
            return None;
        }
        let total_pages = self.total_pages().max(self.page);
        Some(Pagination {
            page: self.page,
            total_pages,
            has_previous: self.page > 1,
            has_next: self.page < total_pages,
        })
    }

    /// Starts a new search for `query` at page 1.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptyQuery` - If the query is blank; the state is left unchanged
    pub fn submit(&mut self, query: &str) -> Result<SearchRequest, ValidationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }

        self.query = query.to_string();
        self.total_count = 0;
        Ok(self.begin(1))
    }

    /// Requests page `page` of the current query.
    ///
    /// Returns `None` unless results are shown and `page` is a different
    /// page within `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: u32) -> Option<SearchRequest> {
        let pagination = self.pagination()?;
        if page < 1 || page > pagination.total_pages || page == self.page {
            return None;
        }
        Some(self.begin(page))
    }

    /// Requests the following page, if there is one.
    pub fn next_page(&mut self) -> Option<SearchRequest> {
        self.go_to_page(self.page.saturating_add(1))
    }

    /// Requests the preceding page, if there is one.
    pub fn previous_page(&mut self) -> Option<SearchRequest> {
        self.go_to_page(self.page.saturating_sub(1))
    }

    /// Applies the outcome of `request`.
    ///
    /// Returns `false` and changes nothing if the request is stale. A failed
    /// fetch moves to `NoResults` with a zero count rather than keeping old
    /// results on screen.
    pub fn apply(
        &mut self,
        request: &SearchRequest,
        outcome: Result<SearchPage, MovieSearchError>,
    ) -> bool {
        if self.phase != SearchPhase::Searching || request.generation != self.generation {
            tracing::debug!(
                "Discarding stale results for '{}' page {}",
                request.query,
                request.page
            );
            return false;
        }

        match outcome {
            Ok(page) => {
                self.total_count = page.total_count;
                self.results = page.results;
                self.last_error = None;
                self.phase = if self.results.is_empty() {
                    SearchPhase::NoResults
                } else {
                    SearchPhase::ResultsReady
                };
            }
            Err(e) => {
                self.results.clear();
                self.total_count = 0;
                self.last_error = Some(e.to_string());
                self.phase = SearchPhase::NoResults;
            }
        }
        true
    }

    /// Discards query and results and returns to `Idle`.
    ///
    /// Any request still in flight becomes stale.
    pub fn return_home(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    fn begin(&mut self, page: u32) -> SearchRequest {
        self.generation += 1;
        self.page = page;
        self.results.clear();
        self.last_error = None;
        self.phase = SearchPhase::Searching;

        SearchRequest {
            generation: self.generation,
            query: self.query.clone(),
            page,
        }
    }
}

/// Canned searches offered on the home and no-results views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickSearch {
    /// Action titles
    Action,
    /// Comedy titles
    Comedy,
    /// Drama titles
    Drama,
    /// Horror titles
    Horror,
    /// Fallback suggestion when a search finds nothing
    Popular,
}

impl QuickSearch {
    /// Every quick search, in display order.
    pub const ALL: [QuickSearch; 5] = [
        QuickSearch::Action,
        QuickSearch::Comedy,
        QuickSearch::Drama,
        QuickSearch::Horror,
        QuickSearch::Popular,
    ];

    /// Query text submitted for this shortcut.
    pub fn query(self) -> &'static str {
        match self {
            QuickSearch::Action => "action",
            QuickSearch::Comedy => "comedy",
            QuickSearch::Drama => "drama",
            QuickSearch::Horror => "horror",
            QuickSearch::Popular => "popular",
        }
    }
}

impl FromStr for QuickSearch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuickSearch::ALL
            .into_iter()
            .find(|q| q.query().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("Unknown quick search '{s}'. Valid options are: action, comedy, drama, horror, popular")
            })
    }
}

/// Drives a [`SearchState`] against a catalog.
///
/// Fetch failures never escape: they land the listing in `NoResults`.
#[derive(Debug)]
pub struct SearchSession<C> {
    catalog: C,
    state: SearchState,
    history: Option<SearchHistory>,
}

impl<C: MovieCatalog> SearchSession<C> {
    /// Creates an idle session over `catalog`.
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            state: SearchState::new(),
            history: None,
        }
    }

    /// Records every submitted query in `history`.
    pub fn with_history(mut self, history: SearchHistory) -> Self {
        self.history = Some(history);
        self
    }

    /// Current listing.
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Submits `query` and fetches its first page.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptyQuery` - If the query is blank; nothing is fetched
    pub async fn submit(&mut self, query: &str) -> Result<&SearchState, ValidationError> {
        let request = self.state.submit(query)?;
        if let Some(history) = &self.history {
            if let Err(e) = history.record(&request.query) {
                tracing::warn!("Failed to record search history: {}", e);
            }
        }
        self.fetch(request).await;
        Ok(&self.state)
    }

    /// Runs one of the canned searches.
    pub async fn quick_search(&mut self, shortcut: QuickSearch) -> &SearchState {
        if let Ok(request) = self.state.submit(shortcut.query()) {
            self.fetch(request).await;
        }
        &self.state
    }

    /// Moves to the next page. Returns `false` if there is none.
    pub async fn next_page(&mut self) -> bool {
        match self.state.next_page() {
            Some(request) => self.fetch(request).await,
            None => false,
        }
    }

    /// Moves to the previous page. Returns `false` if there is none.
    pub async fn previous_page(&mut self) -> bool {
        match self.state.previous_page() {
            Some(request) => self.fetch(request).await,
            None => false,
        }
    }

    /// Jumps to `page`. Returns `false` if it is out of range.
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        match self.state.go_to_page(page) {
            Some(request) => self.fetch(request).await,
            None => false,
        }
    }

    /// Returns to the idle home view.
    pub fn return_home(&mut self) {
        self.state.return_home();
    }

    async fn fetch(&mut self, request: SearchRequest) -> bool {
        let outcome = self.catalog.search(&request.query, request.page).await;
        if let Err(e) = &outcome {
            tracing::warn!(
                "Search for '{}' page {} failed: {}",
                request.query,
                request.page,
                e
            );
        }
        self.state.apply(&request, outcome)
    }
}
