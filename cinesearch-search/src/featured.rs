//! Hand-picked titles shown without a search.

/// Titles cycled by the home page carousel.
pub const CAROUSEL_IDS: [&str; 6] = [
    "tt0111161", // The Shawshank Redemption
    "tt0068646", // The Godfather
    "tt0468569", // The Dark Knight
    "tt0071562", // The Godfather Part II
    "tt0050083", // 12 Angry Men
    "tt0108052", // Schindler's List
];

/// Sidebar "popular now" titles.
pub const POPULAR_IDS: [&str; 5] = [
    "tt10872600",
    "tt9376612",
    "tt6710474",
    "tt1877830",
    "tt9032400",
];

/// Sidebar "classics" titles.
pub const CLASSIC_IDS: [&str; 5] = [
    "tt0110912",
    "tt0120737",
    "tt0167260",
    "tt0109830",
    "tt0137523",
];

/// Titles that carry the "featured" badge on movie cards.
pub const FEATURED_BADGE_IDS: [&str; 12] = [
    "tt0111161",
    "tt0068646",
    "tt0468569",
    "tt0071562",
    "tt0050083",
    "tt0108052",
    "tt0110912",
    "tt0120737",
    "tt0167260",
    "tt0109830",
    "tt0137523",
    "tt10872600",
];

/// Whether `id` carries the featured badge.
pub fn is_featured(id: &str) -> bool {
    FEATURED_BADGE_IDS.contains(&id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_badge_list_covers_carousel_and_classics() {
        for id in CAROUSEL_IDS.iter().chain(CLASSIC_IDS.iter()) {
            assert!(is_featured(id), "{id} should carry the badge");
        }
        assert!(is_featured("tt10872600"));
        assert!(!is_featured("tt9376612"));
        assert!(!is_featured(""));
    }

    #[test]
    fn test_lists_have_no_duplicates() {
        let badges: HashSet<_> = FEATURED_BADGE_IDS.iter().collect();
        assert_eq!(badges.len(), FEATURED_BADGE_IDS.len());

        let sidebar: HashSet<_> = POPULAR_IDS.iter().chain(CLASSIC_IDS.iter()).collect();
        assert_eq!(sidebar.len(), POPULAR_IDS.len() + CLASSIC_IDS.len());
    }
}
