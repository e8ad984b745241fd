//! Integration tests for the OMDb client against an in-process fake catalog.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cinesearch_core::config::ApiConfig;
use cinesearch_core::{FavoritesStore, MemoryStore};
use cinesearch_search::aggregate::{fetch_details, load_detail_page};
use cinesearch_search::{MovieCatalog, MovieSearchError, OmdbClient, SearchPhase, SearchSession};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};

const API_KEY: &str = "test-key";

type Requests = Arc<Mutex<Vec<HashMap<String, String>>>>;

fn batman_page(page: &str) -> Value {
    let items: Vec<Value> = (1..=3)
        .map(|i| {
            let poster = if i == 3 {
                "N/A".to_string()
            } else {
                format!("https://img.example.com/{i}.jpg")
            };
            json!({
                "Title": format!("Batman {page}.{i}"),
                "Year": "1989",
                "imdbID": format!("tt00963{page}{i}"),
                "Type": "movie",
                "Poster": poster,
            })
        })
        .collect();
    json!({"Search": items, "totalResults": "47", "Response": "True"})
}

fn dark_knight() -> Value {
    json!({
        "Title": "The Dark Knight",
        "Year": "2008",
        "Rated": "PG-13",
        "Released": "18 Jul 2008",
        "Runtime": "152 min",
        "Genre": "Action, Crime, Drama",
        "Director": "Christopher Nolan",
        "Actors": "Christian Bale, Heath Ledger, Aaron Eckhart",
        "Plot": "When the menace known as the Joker wreaks havoc...",
        "Awards": "Won 2 Oscars. 164 wins & 164 nominations total",
        "Poster": "https://img.example.com/dark-knight.jpg",
        "Ratings": [
            {"Source": "Internet Movie Database", "Value": "9.0/10"},
            {"Source": "Metacritic", "Value": "N/A"}
        ],
        "imdbRating": "9.0",
        "imdbID": "tt0468569",
        "Type": "movie",
        "Response": "True"
    })
}

async fn omdb(
    State(requests): State<Requests>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut recorded = params.clone();
    if let Some(agent) = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()) {
        recorded.insert("user-agent".to_string(), agent.to_string());
    }
    requests.lock().push(recorded);

    if params.get("apikey").map(String::as_str) != Some(API_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"Response": "False", "Error": "Invalid API key!"})),
        )
            .into_response();
    }

    if let Some(id) = params.get("i") {
        return match id.as_str() {
            "tt0468569" => Json(dark_knight()).into_response(),
            "tt0000500" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
            "tt0000999" => "{not json".into_response(),
            _ => Json(json!({"Response": "False", "Error": "Incorrect IMDb ID."})).into_response(),
        };
    }

    match params.get("s").map(String::as_str) {
        Some("batman") => {
            let page = params.get("page").cloned().unwrap_or_else(|| "1".to_string());
            Json(batman_page(&page)).into_response()
        }
        Some("a") => Json(json!({"Response": "False", "Error": "Too many results."})).into_response(),
        Some("limit") => Json(json!({"Response": "False", "Error": "Request limit reached!"}))
            .into_response(),
        _ => Json(json!({"Response": "False", "Error": "Movie not found!"})).into_response(),
    }
}

async fn spawn_fake_omdb() -> (SocketAddr, Requests) {
    let requests = Requests::default();
    let app = Router::new()
        .route("/", get(omdb))
        .with_state(requests.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, requests)
}

fn client_for(addr: SocketAddr) -> OmdbClient {
    let config = ApiConfig {
        omdb_base_url: format!("http://{addr}/"),
        omdb_api_key: Some(API_KEY.to_string()),
        ..ApiConfig::default()
    };
    OmdbClient::new(&config)
}

#[tokio::test]
async fn test_search_sends_query_page_and_key() {
    let (addr, requests) = spawn_fake_omdb().await;
    let client = client_for(addr);

    let page = assert_ok!(client.search("batman", 2).await);

    assert_eq!(page.total_count, 47);
    assert_eq!(page.total_pages(), 5);
    assert_eq!(page.results.len(), 3);
    assert_eq!(page.results[0].title, "Batman 2.1");
    assert!(page.results[0].has_poster());
    assert!(!page.results[2].has_poster());

    let sent = requests.lock()[0].clone();
    assert_eq!(sent.get("s").map(String::as_str), Some("batman"));
    assert_eq!(sent.get("page").map(String::as_str), Some("2"));
    assert_eq!(sent.get("apikey").map(String::as_str), Some(API_KEY));
}

#[tokio::test]
async fn test_search_without_matches_is_empty_page() {
    let (addr, _) = spawn_fake_omdb().await;
    let client = client_for(addr);

    let none = assert_ok!(client.search("zzzzqqq", 1).await);
    assert!(none.results.is_empty());
    assert_eq!(none.total_count, 0);

    let too_broad = assert_ok!(client.search("a", 1).await);
    assert!(too_broad.results.is_empty());
}

#[tokio::test]
async fn test_search_upstream_error_is_reported() {
    let (addr, _) = spawn_fake_omdb().await;
    let client = client_for(addr);

    let err = assert_err!(client.search("limit", 1).await);
    assert!(matches!(
        err,
        MovieSearchError::UpstreamError { ref reason } if reason == "Request limit reached!"
    ));
}

#[tokio::test]
async fn test_invalid_key_is_upstream_error() {
    let (addr, _) = spawn_fake_omdb().await;
    let client = OmdbClient::with_config(format!("http://{addr}/"), Some("wrong".to_string()));

    let err = client.search("batman", 1).await.unwrap_err();
    assert!(matches!(
        err,
        MovieSearchError::UpstreamError { ref reason } if reason == "Invalid API key!"
    ));
}

#[tokio::test]
async fn test_explicit_endpoint_keeps_client_settings() {
    let (addr, requests) = spawn_fake_omdb().await;
    let client = OmdbClient::with_config(format!("http://{addr}/"), Some(API_KEY.to_string()));

    assert_ok!(client.search("batman", 1).await);

    let sent = requests.lock()[0].clone();
    assert_eq!(
        sent.get("user-agent").map(String::as_str),
        Some(ApiConfig::default().user_agent)
    );
}

#[tokio::test]
async fn test_detail_decodes_record() {
    let (addr, requests) = spawn_fake_omdb().await;
    let client = client_for(addr);

    let movie = assert_ok!(client.get_detail("tt0468569").await);

    assert_eq!(movie.title(), "The Dark Knight");
    assert_eq!(movie.summary.year, "2008");
    assert_eq!(movie.rating, Some(9.0));
    assert_eq!(movie.genres(), vec!["Action", "Crime", "Drama"]);
    assert_eq!(movie.actors.len(), 3);
    assert_eq!(movie.ratings.len(), 1);
    assert!(movie.is_top_rated());

    let sent = requests.lock()[0].clone();
    assert_eq!(sent.get("i").map(String::as_str), Some("tt0468569"));
}

#[tokio::test]
async fn test_detail_error_kinds() {
    let (addr, _) = spawn_fake_omdb().await;
    let client = client_for(addr);

    assert!(matches!(
        client.get_detail("tt404").await,
        Err(MovieSearchError::NotFound { ref id }) if id == "tt404"
    ));
    assert!(matches!(
        client.get_detail("tt0000500").await,
        Err(MovieSearchError::UpstreamError { ref reason }) if reason.contains("500")
    ));
    assert!(matches!(
        client.get_detail("tt0000999").await,
        Err(MovieSearchError::ParseError { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_catalog_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr).get_detail("tt0468569").await.unwrap_err();
    assert!(matches!(err, MovieSearchError::NetworkError { .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_search_session_over_http() {
    let (addr, _) = spawn_fake_omdb().await;
    let mut session = SearchSession::new(client_for(addr));

    let state = session.submit("batman").await.unwrap();
    assert_eq!(state.phase(), SearchPhase::ResultsReady);
    assert_eq!(state.total_count(), 47);
    assert_eq!(state.pagination().unwrap().total_pages, 5);

    assert!(session.go_to_page(5).await);
    assert!(!session.next_page().await);

    let state = session.submit("nothing-matches").await.unwrap();
    assert_eq!(state.phase(), SearchPhase::NoResults);
}

#[tokio::test]
async fn test_fan_out_over_http_keeps_partial_results() {
    let (addr, _) = spawn_fake_omdb().await;
    let client = client_for(addr);

    let report = fetch_details(&client, &["tt0468569", "tt0000500", "tt404"]).await;

    assert_eq!(report.movies.len(), 1);
    assert_eq!(report.failures.len(), 2);
}

#[tokio::test]
async fn test_detail_page_over_http() {
    let (addr, _) = spawn_fake_omdb().await;
    let client = client_for(addr);
    let favorites = FavoritesStore::new(Arc::new(MemoryStore::new()));

    let page = load_detail_page(&client, &favorites, "tt0468569", 6).await;

    assert_eq!(page.movie.unwrap().title(), "The Dark Knight");
    assert!(!page.is_favorite);
    // "Action" has no matches in the fake catalog
    assert!(page.related.is_empty());
}
