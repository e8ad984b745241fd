//! Test fixtures for building movie records without a catalog.

use crate::movie::{MediaType, MovieDetail, MovieSummary, Rating};

/// Creates a summary with a poster.
pub fn sample_summary(id: &str, title: &str) -> MovieSummary {
    MovieSummary {
        id: id.to_string(),
        title: title.to_string(),
        year: "1994".to_string(),
        poster: Some(format!("https://img.example.com/{id}.jpg")),
        media_type: MediaType::Movie,
    }
}

/// Creates a fully populated detail record with a poster.
pub fn sample_detail(id: &str, title: &str) -> MovieDetail {
    MovieDetail {
        summary: sample_summary(id, title),
        plot: Some(format!("Plot of {title}.")),
        genre: Some("Drama, Crime".to_string()),
        runtime: Some("142 min".to_string()),
        director: Some("Frank Darabont".to_string()),
        actors: vec!["Tim Robbins".to_string(), "Morgan Freeman".to_string()],
        released: Some("14 Oct 1994".to_string()),
        awards: Some("Nominated for 7 Oscars.".to_string()),
        rating: Some(9.3),
        ratings: vec![Rating {
            source: "Internet Movie Database".to_string(),
            value: "9.3/10".to_string(),
        }],
    }
}

/// Creates a detail record whose catalog entry has no artwork.
pub fn sample_detail_without_poster(id: &str, title: &str) -> MovieDetail {
    let mut detail = sample_detail(id, title);
    detail.summary.poster = None;
    detail
}
