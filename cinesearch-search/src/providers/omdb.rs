//! OMDb catalog client.
//!
//! Decodes OMDb's PascalCase payloads into the core movie model. The "N/A"
//! sentinel OMDb uses for missing fields is translated to `None` here and
//! nowhere else.

use async_trait::async_trait;
use cinesearch_core::config::ApiConfig;
use cinesearch_core::{MediaType, MovieDetail, MovieSummary, Rating, SearchPage};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::MovieCatalog;
use crate::errors::MovieSearchError;

/// Value OMDb uses for "field unavailable".
pub const UNAVAILABLE: &str = "N/A";

/// HTTP client for the OMDb API.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Response from the OMDb search endpoint (`?s=`).
#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Single hit inside a search response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbSearchItem {
    title: Option<String>,
    year: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Type")]
    media_type: Option<String>,
    poster: Option<String>,
}

/// Response from the OMDb detail endpoint (`?i=`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbDetailResponse {
    title: Option<String>,
    year: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Type")]
    media_type: Option<String>,
    poster: Option<String>,
    plot: Option<String>,
    genre: Option<String>,
    runtime: Option<String>,
    director: Option<String>,
    actors: Option<String>,
    released: Option<String>,
    awards: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(default)]
    ratings: Vec<OmdbRating>,
    response: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbRating {
    source: String,
    value: String,
}

/// Minimal shape used to pull an error message out of any OMDb payload.
#[derive(Debug, Deserialize)]
struct OmdbErrorBody {
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl OmdbClient {
    /// Creates a client for the configured OMDb endpoint.
    ///
    /// Falls back to a default HTTP client if the configured one cannot be
    /// built.
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: http_client(config),
            base_url: config.omdb_base_url.clone(),
            api_key: config.omdb_api_key.clone(),
        }
    }

    /// Creates a client with an explicit endpoint and API key, keeping the
    /// default timeout and user agent.
    pub fn with_config(base_url: String, api_key: Option<String>) -> Self {
        Self::new(&ApiConfig {
            omdb_base_url: base_url,
            omdb_api_key: api_key,
            ..ApiConfig::default()
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T, MovieSearchError> {
        if let Some(ref api_key) = self.api_key {
            params.push(("apikey", api_key.clone()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| MovieSearchError::NetworkError {
                reason: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MovieSearchError::NetworkError {
                reason: format!("Reading response failed: {e}"),
            })?;

        if !status.is_success() {
            let reason = serde_json::from_str::<OmdbErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(MovieSearchError::UpstreamError { reason });
        }

        serde_json::from_str(&body).map_err(|e| MovieSearchError::ParseError {
            reason: format!("JSON parsing failed: {e}"),
        })
    }
}

#[async_trait]
impl MovieCatalog for OmdbClient {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, MovieSearchError> {
        if page == 0 {
            return Err(MovieSearchError::InvalidPage { page });
        }
        tracing::debug!("OMDb search '{}' page {}", query, page);

        let response: OmdbSearchResponse = self
            .get_json(vec![("s", query.to_string()), ("page", page.to_string())])
            .await?;
        parse_search_response(response)
    }

    async fn get_detail(&self, id: &str) -> Result<MovieDetail, MovieSearchError> {
        tracing::debug!("OMDb detail lookup {}", id);

        let response: OmdbDetailResponse = self.get_json(vec![("i", id.to_string())]).await?;
        parse_detail_response(id, response)
    }
}

impl Default for OmdbClient {
    fn default() -> Self {
        Self::new(&ApiConfig::default())
    }
}

fn http_client(config: &ApiConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .user_agent(config.user_agent)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
}

fn is_failure(response: Option<&str>) -> bool {
    response.is_some_and(|r| r.eq_ignore_ascii_case("false"))
}

/// Messages OMDb sends when a search simply has nothing to show.
fn is_empty_search_message(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("not found") || message.contains("too many results")
}

fn is_unknown_id_message(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("not found") || message.contains("incorrect imdb id")
}

/// Drops the "N/A" sentinel and blank strings.
fn available(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != UNAVAILABLE
    })
}

fn parse_search_response(response: OmdbSearchResponse) -> Result<SearchPage, MovieSearchError> {
    if is_failure(response.response.as_deref()) {
        let message = response.error.unwrap_or_else(|| "Unknown error".to_string());
        if is_empty_search_message(&message) {
            tracing::debug!("OMDb search returned no results: {}", message);
            return Ok(SearchPage::empty());
        }
        return Err(MovieSearchError::UpstreamError { reason: message });
    }

    let total_count = response
        .total_results
        .and_then(|t| t.trim().parse::<u32>().ok())
        .unwrap_or(0);

    let results = response
        .search
        .into_iter()
        .filter_map(|item| {
            let id = available(item.imdb_id)?;
            Some(MovieSummary {
                id,
                title: available(item.title).unwrap_or_else(|| "Unknown".to_string()),
                year: available(item.year).unwrap_or_default(),
                poster: available(item.poster),
                media_type: item
                    .media_type
                    .as_deref()
                    .map(MediaType::from_tag)
                    .unwrap_or_default(),
            })
        })
        .collect();

    Ok(SearchPage {
        results,
        total_count,
    })
}

fn parse_detail_response(
    requested_id: &str,
    response: OmdbDetailResponse,
) -> Result<MovieDetail, MovieSearchError> {
    if is_failure(response.response.as_deref()) {
        let message = response.error.unwrap_or_else(|| "Unknown error".to_string());
        if is_unknown_id_message(&message) {
            return Err(MovieSearchError::NotFound {
                id: requested_id.to_string(),
            });
        }
        return Err(MovieSearchError::UpstreamError { reason: message });
    }

    let actors = available(response.actors)
        .map(|actors| {
            actors
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let rating = available(response.imdb_rating)
        .and_then(|r| r.trim().parse::<f32>().ok())
        .filter(|r| r.is_finite());

    let ratings = response
        .ratings
        .into_iter()
        .filter(|r| r.value.trim() != UNAVAILABLE)
        .map(|r| Rating {
            source: r.source,
            value: r.value,
        })
        .collect();

    Ok(MovieDetail {
        summary: MovieSummary {
            id: available(response.imdb_id).unwrap_or_else(|| requested_id.to_string()),
            title: available(response.title).unwrap_or_else(|| "Unknown".to_string()),
            year: available(response.year).unwrap_or_default(),
            poster: available(response.poster),
            media_type: response
                .media_type
                .as_deref()
                .map(MediaType::from_tag)
                .unwrap_or_default(),
        },
        plot: available(response.plot),
        genre: available(response.genre),
        runtime: available(response.runtime),
        director: available(response.director),
        actors,
        released: available(response.released),
        awards: available(response.awards),
        rating,
        ratings,
    })
}
