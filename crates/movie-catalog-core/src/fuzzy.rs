//! Typo-tolerant title search: substring containment first, edit distance second.

use movie_catalog_models::MovieRecord;

/// Maximum edit distance still counted as a match.
///
/// Fixed rather than scaled by title length, so very short titles match
/// almost any short query.
pub const MATCH_THRESHOLD: usize = 4;

/// Levenshtein distance over characters (insert, delete, substitute cost 1)
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Whether a stored title matches a search query, ignoring case
pub fn matches(title: &str, query: &str) -> bool {
    let title = title.to_lowercase();
    let query = query.trim().to_lowercase();

    title.contains(&query) || edit_distance(&title, &query) <= MATCH_THRESHOLD
}

/// All movies whose title matches the query, in collection order
pub fn search<'a>(movies: &'a [MovieRecord], query: &str) -> Vec<&'a MovieRecord> {
    movies.iter().filter(|m| matches(&m.title, query)).collect()
}
