//! Movie catalog backends.

use async_trait::async_trait;
use cinesearch_core::{MovieDetail, SearchPage};

use crate::errors::MovieSearchError;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod omdb;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::StaticCatalog;
pub use omdb::OmdbClient;

/// Read-only access to a movie metadata catalog.
///
/// Implementations are stateless: every call is one upstream request, with
/// no de-duplication or caching, and every failure is returned to the
/// caller rather than replaced by empty data.
#[async_trait]
pub trait MovieCatalog: Send + Sync + std::fmt::Debug {
    /// Fetches one page of titles matching `query`. Pages start at 1.
    ///
    /// # Errors
    /// - `MovieSearchError::InvalidPage` - `page` is 0
    /// - `MovieSearchError::NetworkError` - Network connectivity issues
    /// - `MovieSearchError::ParseError` - Undecodable response
    /// - `MovieSearchError::UpstreamError` - Catalog reported an error
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, MovieSearchError>;

    /// Fetches the full record for identifier `id`.
    ///
    /// # Errors
    /// - `MovieSearchError::NotFound` - No title has this identifier
    /// - `MovieSearchError::NetworkError` - Network connectivity issues
    /// - `MovieSearchError::ParseError` - Undecodable response
    /// - `MovieSearchError::UpstreamError` - Catalog reported an error
    async fn get_detail(&self, id: &str) -> Result<MovieDetail, MovieSearchError>;
}

#[async_trait]
impl<C: MovieCatalog + ?Sized> MovieCatalog for std::sync::Arc<C> {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, MovieSearchError> {
        (**self).search(query, page).await
    }

    async fn get_detail(&self, id: &str) -> Result<MovieDetail, MovieSearchError> {
        (**self).get_detail(id).await
    }
}
