//! Storage port for persisted client state.
//!
//! Favorites, the session and search history all live in a flat key-value
//! namespace of JSON strings. Every read goes back to the store and every
//! write replaces the whole value; nothing is cached in memory.

pub mod file_store;
pub mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use file_store::FileStore;
pub use memory::MemoryStore;

/// Synchronous key-value storage backend.
///
/// Implementations use interior mutability so stores can be shared behind
/// `&self` by several components at once.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value for `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// - `StorageError::InvalidKey` - If the key cannot be represented by the backend
    /// - `StorageError::Io` - If the backend could not be read
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value for `key`.
    ///
    /// # Errors
    ///
    /// - `StorageError::InvalidKey` - If the key cannot be represented by the backend
    /// - `StorageError::Io` - If the backend could not be written
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// - `StorageError::InvalidKey` - If the key cannot be represented by the backend
    /// - `StorageError::Io` - If the backend could not be written
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Errors that occur while reading or writing persisted state.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Key is empty or contains characters the backend cannot store
    #[error("Invalid storage key: '{key}'")]
    InvalidKey {
        /// The rejected key
        key: String,
    },

    /// Value could not be encoded as JSON
    #[error("Serialization failed for '{key}': {reason}")]
    Serialization {
        /// Key being written
        key: String,
        /// Encoder error message
        reason: String,
    },

    /// Standard I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads and decodes the JSON value stored under `key`.
///
/// Missing keys, unreadable backends and malformed JSON all yield `None`;
/// persisted state is never trusted to be well-formed.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Failed to read '{}' from storage: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring malformed '{}' entry in storage: {}", key, e);
            None
        }
    }
}

/// Encodes `value` as JSON and stores it under `key`, replacing any old value.
///
/// # Errors
///
/// - `StorageError::Serialization` - If the value cannot be encoded
/// - `StorageError::Io` - If the backend could not be written
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|e| StorageError::Serialization {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json_missing_key() {
        let store = MemoryStore::new();
        let value: Option<Vec<String>> = load_json(&store, "absent");
        assert!(value.is_none());
    }

    #[test]
    fn test_load_json_malformed_value() {
        let store = MemoryStore::new();
        store.set("broken", "{not json").unwrap();

        let value: Option<Vec<String>> = load_json(&store, "broken");
        assert!(value.is_none());
    }

    #[test]
    fn test_load_json_wrong_shape() {
        let store = MemoryStore::new();
        store.set("shape", "{\"a\": 1}").unwrap();

        let value: Option<Vec<String>> = load_json(&store, "shape");
        assert!(value.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        save_json(&store, "queries", &["batman", "alien"]).unwrap();

        let value: Option<Vec<String>> = load_json(&store, "queries");
        assert_eq!(value.unwrap(), vec!["batman", "alien"]);
    }
}
