//! Movie data model.
//!
//! Upstream sentinels ("N/A") never reach these types: absent values are
//! `None` or empty collections, decoded once at the client boundary.

use serde::{Deserialize, Serialize};

/// Number of results the upstream catalog returns per search page.
pub const PAGE_SIZE: u32 = 10;

/// Rating at or above which a movie gets the "top" badge.
pub const TOP_RATING_THRESHOLD: f32 = 8.0;

/// Kind of title as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Series,
    Episode,
    Game,
    #[serde(other)]
    Other,
}

impl MediaType {
    /// Parses the catalog's lowercase type tag, falling back to `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "movie" => Self::Movie,
            "series" => Self::Series,
            "episode" => Self::Episode,
            "game" => Self::Game,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Movie => write!(f, "MOVIE"),
            Self::Series => write!(f, "SERIES"),
            Self::Episode => write!(f, "EPISODE"),
            Self::Game => write!(f, "GAME"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// Search hit as returned by a catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// External identifier (IMDb ID)
    pub id: String,
    pub title: String,
    /// Release year as published, which may be a range for series
    pub year: String,
    /// Poster URL, `None` when the catalog has no artwork
    pub poster: Option<String>,
    pub media_type: MediaType,
}

impl MovieSummary {
    /// Whether the catalog provides artwork for this title.
    pub fn has_poster(&self) -> bool {
        self.poster.is_some()
    }
}

/// Rating from a single source, e.g. ("Rotten Tomatoes", "91%").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub source: String,
    pub value: String,
}

/// Full record for one title.
///
/// Fetched lazily per identifier and never cached: each consumer re-fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    pub plot: Option<String>,
    /// Comma-joined genre list as published
    pub genre: Option<String>,
    pub runtime: Option<String>,
    pub director: Option<String>,
    pub actors: Vec<String>,
    pub released: Option<String>,
    pub awards: Option<String>,
    /// Aggregate rating on a 0-10 scale
    pub rating: Option<f32>,
    pub ratings: Vec<Rating>,
}

impl MovieDetail {
    pub fn id(&self) -> &str {
        &self.summary.id
    }

    pub fn title(&self) -> &str {
        &self.summary.title
    }

    pub fn has_poster(&self) -> bool {
        self.summary.has_poster()
    }

    /// Individual genres, trimmed, in published order.
    pub fn genres(&self) -> Vec<&str> {
        self.genre
            .as_deref()
            .map(|genre| {
                genre
                    .split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First listed genre, used to look up related titles.
    pub fn main_genre(&self) -> Option<&str> {
        self.genres().into_iter().next()
    }

    pub fn is_top_rated(&self) -> bool {
        self.rating.is_some_and(|r| r >= TOP_RATING_THRESHOLD)
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<MovieSummary>,
    /// Total hits across all pages
    pub total_count: u32,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of pages needed to show `total_count` hits.
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count)
    }
}

/// Number of pages of [`PAGE_SIZE`] needed for `total_count` hits.
pub fn total_pages(total_count: u32) -> u32 {
    total_count.div_ceil(PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::sample_detail;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(23), 3);
        assert_eq!(total_pages(47), 5);
    }

    #[test]
    fn test_genres_are_split_and_trimmed() {
        let mut detail = sample_detail("tt0468569", "The Dark Knight");
        detail.genre = Some("Action, Crime,  Drama".to_string());

        assert_eq!(detail.genres(), vec!["Action", "Crime", "Drama"]);
        assert_eq!(detail.main_genre(), Some("Action"));

        detail.genre = None;
        assert!(detail.genres().is_empty());
        assert_eq!(detail.main_genre(), None);
    }

    #[test]
    fn test_top_rated_threshold() {
        let mut detail = sample_detail("tt0111161", "The Shawshank Redemption");
        detail.rating = Some(8.0);
        assert!(detail.is_top_rated());

        detail.rating = Some(7.9);
        assert!(!detail.is_top_rated());

        detail.rating = None;
        assert!(!detail.is_top_rated());
    }

    #[test]
    fn test_media_type_tags() {
        assert_eq!(MediaType::from_tag("movie"), MediaType::Movie);
        assert_eq!(MediaType::from_tag("Series"), MediaType::Series);
        assert_eq!(MediaType::from_tag("something"), MediaType::Other);

        let parsed: MediaType = serde_json::from_str("\"documentary\"").unwrap();
        assert_eq!(parsed, MediaType::Other);
    }

    #[test]
    fn test_detail_serializes_flat() {
        let detail = sample_detail("tt0068646", "The Godfather");
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["id"], "tt0068646");
        assert_eq!(json["title"], "The Godfather");
        assert!(json.get("summary").is_none());
    }
}
