//! Concurrent detail lookups behind the curated listings.
//!
//! Every projection here fans out one `get_detail` call per identifier,
//! waits for all of them, and keeps whatever succeeded. A failed lookup is
//! recorded in the [`FanOutReport`] and logged; it never fails the listing.

use cinesearch_core::{FavoritesStore, MovieDetail, MovieSummary};
use futures::future::join_all;

use crate::errors::{FavoriteError, MovieSearchError};
use crate::featured::{CAROUSEL_IDS, CLASSIC_IDS, POPULAR_IDS};
use crate::providers::MovieCatalog;

/// A lookup that failed during a fan-out.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    /// Identifier that was looked up
    pub id: String,
    /// Why the lookup failed
    pub error: MovieSearchError,
}

/// Outcome of a fan-out, in input order.
#[derive(Debug, Clone, Default)]
pub struct FanOutReport {
    /// Records that were fetched
    pub movies: Vec<MovieDetail>,
    /// Lookups that failed
    pub failures: Vec<FetchFailure>,
}

impl FanOutReport {
    /// Drops records without artwork.
    pub fn with_artwork(mut self) -> Self {
        self.movies.retain(MovieDetail::has_poster);
        self
    }

    /// Keeps at most `limit` records.
    pub fn take(mut self, limit: usize) -> Self {
        self.movies.truncate(limit);
        self
    }

    /// Whether every lookup succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn log_failures(&self, listing: &str) {
        for failure in &self.failures {
            tracing::warn!(
                "{} lookup for {} failed: {}",
                listing,
                failure.id,
                failure.error
            );
        }
    }
}

/// Fetches every identifier in `ids` concurrently.
pub async fn fetch_details<C, S>(catalog: &C, ids: &[S]) -> FanOutReport
where
    C: MovieCatalog + ?Sized,
    S: AsRef<str>,
{
    let lookups = ids.iter().map(|id| {
        let id = id.as_ref();
        async move { (id, catalog.get_detail(id).await) }
    });

    let mut report = FanOutReport::default();
    for (id, outcome) in join_all(lookups).await {
        match outcome {
            Ok(movie) => report.movies.push(movie),
            Err(error) => report.failures.push(FetchFailure {
                id: id.to_string(),
                error,
            }),
        }
    }

    tracing::debug!(
        "Fetched {} of {} records",
        report.movies.len(),
        report.movies.len() + report.failures.len()
    );
    report
}

/// Titles of the home page carousel that have artwork.
pub async fn load_featured_carousel<C: MovieCatalog + ?Sized>(catalog: &C) -> Vec<MovieDetail> {
    let report = fetch_details(catalog, &CAROUSEL_IDS).await;
    report.log_failures("Carousel");
    report.with_artwork().movies
}

/// The two sidebar listings.
#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    /// "Popular now" titles
    pub popular: Vec<MovieDetail>,
    /// "Classics" titles
    pub classics: Vec<MovieDetail>,
}

impl Sidebar {
    /// Whether both listings came back empty.
    pub fn is_empty(&self) -> bool {
        self.popular.is_empty() && self.classics.is_empty()
    }
}

/// Loads both sidebar listings concurrently, `limit` titles each.
pub async fn load_sidebar<C: MovieCatalog + ?Sized>(catalog: &C, limit: usize) -> Sidebar {
    let (popular, classics) = futures::join!(
        fetch_details(catalog, &POPULAR_IDS),
        fetch_details(catalog, &CLASSIC_IDS)
    );
    popular.log_failures("Popular");
    classics.log_failures("Classics");

    Sidebar {
        popular: popular.with_artwork().take(limit).movies,
        classics: classics.with_artwork().take(limit).movies,
    }
}

/// Titles sharing `movie`'s first genre, excluding `movie` itself.
///
/// Movies without a genre have no related titles. A failed search yields an
/// empty list.
pub async fn load_related<C: MovieCatalog + ?Sized>(
    catalog: &C,
    movie: &MovieDetail,
    limit: usize,
) -> Vec<MovieSummary> {
    let Some(genre) = movie.main_genre() else {
        return Vec::new();
    };

    match catalog.search(genre, 1).await {
        Ok(page) => page
            .results
            .into_iter()
            .filter(|related| related.id != movie.id())
            .take(limit)
            .collect(),
        Err(e) => {
            tracing::warn!("Related titles for {} unavailable: {}", movie.id(), e);
            Vec::new()
        }
    }
}

/// Everything the detail view shows.
#[derive(Debug, Clone, Default)]
pub struct DetailPage {
    /// The record, or `None` if it could not be loaded
    pub movie: Option<MovieDetail>,
    /// Whether the title is a favorite
    pub is_favorite: bool,
    /// Titles sharing its first genre
    pub related: Vec<MovieSummary>,
}

/// Loads the detail view for `id`.
///
/// A failed lookup yields a page with no movie rather than an error.
pub async fn load_detail_page<C: MovieCatalog + ?Sized>(
    catalog: &C,
    favorites: &FavoritesStore,
    id: &str,
    related_limit: usize,
) -> DetailPage {
    let is_favorite = favorites.contains(id);

    let movie = match catalog.get_detail(id).await {
        Ok(movie) => movie,
        Err(e) => {
            tracing::warn!("Details for {} unavailable: {}", id, e);
            return DetailPage {
                movie: None,
                is_favorite,
                related: Vec::new(),
            };
        }
    };

    let related = load_related(catalog, &movie, related_limit).await;
    DetailPage {
        movie: Some(movie),
        is_favorite,
        related,
    }
}

/// Toggles the favorite state of the title with identifier `id`.
///
/// Removing needs only the identifier. Adding fetches the full record first
/// so the stored snapshot is complete. Returns whether the title is a
/// favorite afterwards.
///
/// # Errors
///
/// - `FavoriteError::Catalog` - If the full record could not be fetched; nothing is stored
/// - `FavoriteError::Storage` - If the favorites list could not be persisted
pub async fn toggle_favorite<C: MovieCatalog + ?Sized>(
    catalog: &C,
    favorites: &FavoritesStore,
    id: &str,
) -> Result<bool, FavoriteError> {
    if favorites.contains(id) {
        favorites.remove(id)?;
        return Ok(false);
    }

    let detail = catalog.get_detail(id).await?;
    Ok(favorites.toggle(detail)?)
}

/// Toggles the favorite state of a title shown in a listing.
///
/// # Errors
///
/// - `FavoriteError::Catalog` - If the full record could not be fetched; nothing is stored
/// - `FavoriteError::Storage` - If the favorites list could not be persisted
pub async fn toggle_favorite_from_summary<C: MovieCatalog + ?Sized>(
    catalog: &C,
    favorites: &FavoritesStore,
    summary: &MovieSummary,
) -> Result<bool, FavoriteError> {
    toggle_favorite(catalog, favorites, &summary.id).await
}
