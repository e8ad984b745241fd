//! CineSearch Core - Movie model and persisted client state
//!
//! This crate provides the building blocks shared by every CineSearch
//! surface: the movie data model, the key-value storage port with its
//! backends, the favorites store, session persistence with the auth client,
//! search history, and configuration.

pub mod auth;
pub mod config;
pub mod favorites;
pub mod history;
pub mod movie;
pub mod session;
pub mod storage;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use auth::{AuthClient, AuthOutcome, Credentials};
pub use config::CineSearchConfig;
pub use favorites::{FavoriteRecord, FavoritesStore};
pub use history::SearchHistory;
pub use movie::{MediaType, MovieDetail, MovieSummary, Rating, SearchPage};
pub use session::{Session, SessionStore, UserProfile};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Input rejected before any network call is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("Search query must not be empty")]
    EmptyQuery,
}

/// Core errors that can bubble up from any CineSearch subsystem.
#[derive(Debug, thiserror::Error)]
pub enum CineSearchError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },
}

impl CineSearchError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            CineSearchError::Storage(_) => "Could not save your data".to_string(),
            CineSearchError::Validation(e) => e.to_string(),
            CineSearchError::Unauthenticated => {
                "Please sign in first (cinesearch login --email <EMAIL> --password <PASSWORD>)"
                    .to_string()
            }
            CineSearchError::Configuration { reason } => format!("Invalid configuration: {reason}"),
        }
    }

    /// Checks if this error is due to user input or user state.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CineSearchError::Validation(_) | CineSearchError::Unauthenticated
        )
    }
}

pub type Result<T> = std::result::Result<T, CineSearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_are_classified() {
        assert!(CineSearchError::Unauthenticated.is_user_error());
        assert!(CineSearchError::from(ValidationError::EmptyQuery).is_user_error());

        let storage = CineSearchError::from(StorageError::InvalidKey {
            key: String::new(),
        });
        assert!(!storage.is_user_error());
        assert_eq!(storage.user_message(), "Could not save your data");
    }

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let error = CineSearchError::from(ValidationError::MissingField { field: "email" });
        assert_eq!(error.user_message(), "email is required");
    }
}
