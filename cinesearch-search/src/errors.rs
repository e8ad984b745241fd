//! Error types for catalog access.

use cinesearch_core::StorageError;
use thiserror::Error;

/// Errors that can occur while querying the movie catalog.
#[derive(Debug, Clone, Error)]
pub enum MovieSearchError {
    /// Network communication failed before a response arrived.
    #[error("Network error: {reason}")]
    NetworkError {
        /// The reason for the network error
        reason: String,
    },

    /// Response body could not be decoded.
    #[error("Parse error: {reason}")]
    ParseError {
        /// The reason for the parse error
        reason: String,
    },

    /// Catalog answered with an HTTP error or an error payload.
    #[error("Catalog error: {reason}")]
    UpstreamError {
        /// Message reported by the catalog
        reason: String,
    },

    /// No title exists for the requested identifier.
    #[error("Movie '{id}' not found")]
    NotFound {
        /// The identifier that was looked up
        id: String,
    },

    /// Page numbers start at 1.
    #[error("Invalid page {page}: pages start at 1")]
    InvalidPage {
        /// The rejected page number
        page: u32,
    },
}

impl MovieSearchError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::UpstreamError { .. })
    }
}

/// Errors from favoriting a title found in a listing.
#[derive(Debug, Error)]
pub enum FavoriteError {
    /// The full record could not be fetched for the snapshot.
    #[error(transparent)]
    Catalog(#[from] MovieSearchError),

    /// The favorites list could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(
            MovieSearchError::NetworkError {
                reason: "timeout".to_string()
            }
            .is_transient()
        );
        assert!(
            !MovieSearchError::NotFound {
                id: "tt0".to_string()
            }
            .is_transient()
        );
        assert!(!MovieSearchError::InvalidPage { page: 0 }.is_transient());
    }
}
