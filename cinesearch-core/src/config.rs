//! Centralized configuration for CineSearch.
//!
//! All endpoints, storage keys and display limits are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::path::PathBuf;
use std::time::Duration;

/// Central configuration for all CineSearch components.
#[derive(Debug, Clone, Default)]
pub struct CineSearchConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub display: DisplayConfig,
}

/// Upstream endpoints and HTTP client settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Movie metadata endpoint (OMDb)
    pub omdb_base_url: String,
    /// OMDb API key; requests are sent without one when unset
    pub omdb_api_key: Option<String>,
    /// Authentication API base URL
    pub auth_base_url: String,
    /// Value of the `x-api-key` header sent to the authentication API
    pub auth_api_key: String,
    /// Timeout applied to every upstream request
    pub request_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            omdb_base_url: "https://www.omdbapi.com/".to_string(),
            omdb_api_key: None,
            auth_base_url: "https://reqres.in/api".to_string(),
            auth_api_key: "reqres-free-v1".to_string(),
            request_timeout: Duration::from_secs(10),
            user_agent: "cinesearch/0.1.0",
        }
    }
}

/// Where and under which keys client state is persisted.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory used by the file-backed store
    pub data_dir: PathBuf,
    pub favorites_key: &'static str,
    pub token_key: &'static str,
    pub user_key: &'static str,
    pub history_key: &'static str,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            favorites_key: "favorite_movies",
            token_key: "auth_token",
            user_key: "auth_user",
            history_key: "searchHistory",
        }
    }
}

/// Listing sizes and timings for the presentation layer.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Results per search page, fixed by the upstream catalog
    pub page_size: u32,
    /// Auto-advance period of the featured carousel
    pub carousel_interval: Duration,
    /// Entries shown per sidebar list
    pub sidebar_limit: usize,
    /// Related titles shown on a detail page
    pub related_limit: usize,
    /// Remembered search queries
    pub history_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: crate::movie::PAGE_SIZE,
            carousel_interval: Duration::from_secs(5),
            sidebar_limit: 3,
            related_limit: 6,
            history_limit: 5,
        }
    }
}

fn default_data_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".local/share/cinesearch"),
        None => PathBuf::from(".cinesearch"),
    }
}

impl CineSearchConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Values that fail to parse are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) =
            std::env::var("CINESEARCH_OMDB_API_KEY").or_else(|_| std::env::var("OMDB_API_KEY"))
        {
            if !key.trim().is_empty() {
                config.api.omdb_api_key = Some(key);
            }
        }

        if let Ok(url) = std::env::var("CINESEARCH_OMDB_URL") {
            config.api.omdb_base_url = url;
        }

        if let Ok(url) = std::env::var("CINESEARCH_AUTH_URL") {
            config.api.auth_base_url = url;
        }

        if let Ok(key) = std::env::var("CINESEARCH_AUTH_API_KEY") {
            config.api.auth_api_key = key;
        }

        if let Ok(timeout) = std::env::var("CINESEARCH_REQUEST_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.api.request_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(dir) = std::env::var("CINESEARCH_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }

        if let Ok(interval) = std::env::var("CINESEARCH_CAROUSEL_INTERVAL") {
            if let Ok(seconds) = interval.parse::<u64>() {
                if seconds > 0 {
                    config.display.carousel_interval = Duration::from_secs(seconds);
                }
            }
        }

        config
    }

    /// Creates a configuration for tests, storing state under `data_dir`.
    pub fn for_testing(data_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.storage.data_dir = data_dir.into();
        config.api.request_timeout = Duration::from_secs(2);
        config.display.carousel_interval = Duration::from_millis(100);
        config
    }
}
