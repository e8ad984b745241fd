//! Links to external trailer searches.

use url::Url;

const TRAILER_SEARCH_BASE: &str = "https://www.youtube.com/results";

/// Builds the video-search URL for `title`'s trailer.
///
/// # Errors
///
/// Never fails in practice; the base URL is a valid constant and the query
/// is percent-encoded.
pub fn trailer_search_url(title: &str) -> Result<Url, url::ParseError> {
    let query = urlencoding::encode(&format!("{} trailer", title.trim())).into_owned();
    Url::parse(&format!("{TRAILER_SEARCH_BASE}?search_query={query}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_encoded_with_suffix() {
        let url = trailer_search_url("The Dark Knight").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.youtube.com/results?search_query=The%20Dark%20Knight%20trailer"
        );
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        let url = trailer_search_url("Tom & Jerry: The Movie?").unwrap();
        let (_, value) = url.query_pairs().next().unwrap();
        assert_eq!(value, "Tom & Jerry: The Movie? trailer");
        assert!(!url.as_str().contains("& "));
    }
}
