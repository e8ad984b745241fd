//! Recently submitted search queries.

use std::sync::Arc;

use crate::storage::{KeyValueStore, StorageError, load_json, save_json};

/// Default storage key for the query history.
pub const HISTORY_KEY: &str = "searchHistory";
/// Default number of remembered queries.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Most-recent-first list of distinct queries, bounded in length.
#[derive(Clone)]
pub struct SearchHistory {
    store: Arc<dyn KeyValueStore>,
    key: String,
    limit: usize,
}

impl std::fmt::Debug for SearchHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHistory")
            .field("key", &self.key)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl SearchHistory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_options(store, HISTORY_KEY, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_options(store: Arc<dyn KeyValueStore>, key: impl Into<String>, limit: usize) -> Self {
        Self {
            store,
            key: key.into(),
            limit,
        }
    }

    /// Remembered queries, most recent first.
    pub fn entries(&self) -> Vec<String> {
        load_json(self.store.as_ref(), &self.key).unwrap_or_default()
    }

    /// Moves `query` to the front of the history. Blank queries are ignored.
    ///
    /// # Errors
    ///
    /// - `StorageError` - If the updated history could not be persisted
    pub fn record(&self, query: &str) -> Result<(), StorageError> {
        if query.trim().is_empty() {
            return Ok(());
        }

        let mut entries = self.entries();
        entries.retain(|entry| entry != query);
        entries.insert(0, query.to_string());
        entries.truncate(self.limit);

        save_json(self.store.as_ref(), &self.key, &entries)
    }

    /// Forgets every remembered query.
    ///
    /// # Errors
    ///
    /// - `StorageError` - If the history could not be removed
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn history() -> SearchHistory {
        SearchHistory::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_most_recent_first_without_duplicates() {
        let history = history();
        for query in ["batman", "alien", "batman", "heat"] {
            history.record(query).unwrap();
        }

        assert_eq!(history.entries(), vec!["heat", "batman", "alien"]);
    }

    #[test]
    fn test_bounded_length() {
        let history = history();
        for query in ["a", "b", "c", "d", "e", "f", "g"] {
            history.record(query).unwrap();
        }

        assert_eq!(history.entries(), vec!["g", "f", "e", "d", "c"]);
    }

    #[test]
    fn test_blank_queries_ignored() {
        let history = history();
        history.record("   ").unwrap();
        history.record("").unwrap();
        assert!(history.entries().is_empty());
    }

    #[test]
    fn test_clear() {
        let history = history();
        history.record("matrix").unwrap();
        history.clear().unwrap();
        assert!(history.entries().is_empty());
    }

    #[test]
    fn test_corrupt_history_reads_as_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(HISTORY_KEY, "null").unwrap();

        let history = SearchHistory::new(backend);
        assert!(history.entries().is_empty());
        history.record("dune").unwrap();
        assert_eq!(history.entries(), vec!["dune"]);
    }
}
