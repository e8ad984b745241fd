//! CineSearch Search - Movie discovery over the OMDb catalog
//!
//! Provides the catalog client, the paginated search view-state machine, the
//! concurrent detail aggregators behind the featured carousel, sidebar and
//! related-titles listings, and small presentation helpers.

#![warn(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![warn(clippy::too_many_lines)]

pub mod aggregate;
pub mod carousel;
pub mod errors;
pub mod featured;
pub mod listing;
pub mod providers;
pub mod trailer;

// Re-export main types
pub use aggregate::{DetailPage, FanOutReport, FetchFailure, Sidebar};
pub use carousel::{AutoAdvance, Carousel, SharedCarousel};
pub use errors::{FavoriteError, MovieSearchError};
pub use listing::{Pagination, QuickSearch, SearchPhase, SearchRequest, SearchSession, SearchState};
pub use providers::{MovieCatalog, OmdbClient};
pub use trailer::trailer_search_url;

/// Convenience type alias for Results with MovieSearchError.
pub type Result<T> = std::result::Result<T, MovieSearchError>;
