//! In-memory catalog for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cinesearch_core::{MovieDetail, SearchPage};
use parking_lot::Mutex;

use super::MovieCatalog;
use crate::errors::MovieSearchError;

/// Catalog serving canned search pages and detail records.
///
/// Unknown identifiers are `NotFound`, unknown searches are empty pages.
/// Identifiers and queries can be marked as failing, and individual
/// lookups can be delayed to exercise ordering and staleness.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    details: HashMap<String, MovieDetail>,
    pages: HashMap<(String, u32), SearchPage>,
    failing_ids: HashSet<String>,
    failing_queries: HashSet<String>,
    delays: HashMap<String, Duration>,
    detail_calls: AtomicUsize,
    search_calls: Mutex<Vec<(String, u32)>>,
}

impl StaticCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detail record, keyed by its identifier.
    pub fn with_detail(mut self, detail: MovieDetail) -> Self {
        self.details.insert(detail.id().to_string(), detail);
        self
    }

    /// Serves `page` for `query` at page number `number`.
    pub fn with_page(mut self, query: &str, number: u32, page: SearchPage) -> Self {
        self.pages.insert((query.to_lowercase(), number), page);
        self
    }

    /// Makes lookups of `id` fail with a network error.
    pub fn failing_id(mut self, id: &str) -> Self {
        self.failing_ids.insert(id.to_string());
        self
    }

    /// Makes searches for `query` fail with a network error.
    pub fn failing_query(mut self, query: &str) -> Self {
        self.failing_queries.insert(query.to_lowercase());
        self
    }

    /// Delays responses for `key` (an identifier or a lowercase query).
    pub fn delayed(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    /// Number of `get_detail` calls made so far.
    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    /// Every `(query, page)` searched so far, in call order.
    pub fn search_calls(&self) -> Vec<(String, u32)> {
        self.search_calls.lock().clone()
    }

    async fn wait_for(&self, key: &str) {
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl MovieCatalog for StaticCatalog {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, MovieSearchError> {
        self.search_calls.lock().push((query.to_string(), page));
        if page == 0 {
            return Err(MovieSearchError::InvalidPage { page });
        }

        let key = query.to_lowercase();
        self.wait_for(&key).await;

        if self.failing_queries.contains(&key) {
            return Err(MovieSearchError::NetworkError {
                reason: format!("simulated failure for '{query}'"),
            });
        }
        Ok(self.pages.get(&(key, page)).cloned().unwrap_or_default())
    }

    async fn get_detail(&self, id: &str) -> Result<MovieDetail, MovieSearchError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for(id).await;

        if self.failing_ids.contains(id) {
            return Err(MovieSearchError::NetworkError {
                reason: format!("simulated failure for {id}"),
            });
        }
        self.details
            .get(id)
            .cloned()
            .ok_or_else(|| MovieSearchError::NotFound { id: id.to_string() })
    }
}
