//! Persistent favorites list.
//!
//! The list is stored as one JSON array. Every operation re-reads the whole
//! array and every mutation rewrites it, so two processes sharing a store
//! follow last-write-wins with no merge.

use std::sync::Arc;

use crate::movie::MovieDetail;
use crate::storage::{KeyValueStore, StorageError, load_json, save_json};

/// Snapshot of a movie's details taken when it was favorited.
///
/// Snapshots are never refreshed in place; remove and re-add to update one.
pub type FavoriteRecord = MovieDetail;

/// Default storage key for the favorites array.
pub const FAVORITES_KEY: &str = "favorite_movies";

/// Favorites keyed by movie identifier, in insertion order.
///
/// Invariant: at most one record per identifier.
#[derive(Clone)]
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, FAVORITES_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Returns every stored record in insertion order.
    ///
    /// Missing or corrupt storage reads as an empty list.
    pub fn list(&self) -> Vec<FavoriteRecord> {
        load_json(self.store.as_ref(), &self.key).unwrap_or_default()
    }

    /// Stores `record` unless a record with the same identifier exists.
    ///
    /// Returns whether the record was inserted.
    ///
    /// # Errors
    ///
    /// - `StorageError` - If the updated list could not be persisted
    pub fn add(&self, record: FavoriteRecord) -> Result<bool, StorageError> {
        let mut favorites = self.list();
        if favorites.iter().any(|fav| fav.id() == record.id()) {
            tracing::debug!("{} is already a favorite", record.id());
            return Ok(false);
        }

        tracing::info!("Adding {} ({}) to favorites", record.id(), record.title());
        favorites.push(record);
        self.persist(&favorites)?;
        Ok(true)
    }

    /// Removes the record with identifier `id` if present.
    ///
    /// Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// - `StorageError` - If the updated list could not be persisted
    pub fn remove(&self, id: &str) -> Result<bool, StorageError> {
        let mut favorites = self.list();
        let before = favorites.len();
        favorites.retain(|fav| fav.id() != id);
        let removed = favorites.len() != before;

        if removed {
            tracing::info!("Removing {} from favorites", id);
        }
        self.persist(&favorites)?;
        Ok(removed)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.list().iter().any(|fav| fav.id() == id)
    }

    /// Returns the stored snapshot for `id`.
    pub fn get(&self, id: &str) -> Option<FavoriteRecord> {
        self.list().into_iter().find(|fav| fav.id() == id)
    }

    /// Removes `record` if it is a favorite, adds it otherwise.
    ///
    /// Returns whether the movie is a favorite afterwards.
    ///
    /// # Errors
    ///
    /// - `StorageError` - If the updated list could not be persisted
    pub fn toggle(&self, record: FavoriteRecord) -> Result<bool, StorageError> {
        if self.contains(record.id()) {
            self.remove(record.id())?;
            Ok(false)
        } else {
            self.add(record)?;
            Ok(true)
        }
    }

    fn persist(&self, favorites: &[FavoriteRecord]) -> Result<(), StorageError> {
        save_json(self.store.as_ref(), &self.key, favorites)
    }
}
