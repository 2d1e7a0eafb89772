use movie_catalog_models::{MovieMetadata, RawRatingEntry, NOT_AVAILABLE};
use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;

pub const PROVIDER: &str = "OMDb";

const NOT_FOUND_MESSAGE: &str = "Movie not found!";

#[derive(Debug, Deserialize)]
struct OmdbRating {
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct OmdbMovie {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Ratings", default)]
    ratings: Vec<OmdbRating>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

/// Leading digits of an OMDb year ("2010", "2010–2014", "2019–")
pub fn parse_year(raw: &str) -> Option<i32> {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Extract the error message of a `"Response": "False"` body, if that is what it is
pub fn parse_error_message(body: &str) -> Option<String> {
    let movie: OmdbMovie = serde_json::from_str(body).ok()?;
    if movie.response == "False" {
        Some(movie.error.unwrap_or_else(|| "unknown error".to_string()))
    } else {
        None
    }
}

/// Parse a successful OMDb title lookup.
///
/// `Ok(None)` when OMDb reports the title as not found.
pub fn parse_movie_response(body: &str) -> Result<Option<MovieMetadata>, SourceError> {
    let movie: OmdbMovie = serde_json::from_str(body)
        .map_err(|e| SourceError::invalid(PROVIDER, format!("malformed JSON: {}", e)))?;

    if movie.response != "True" {
        let message = movie.error.unwrap_or_else(|| "unknown error".to_string());
        if message == NOT_FOUND_MESSAGE {
            debug!("OMDb has no match");
            return Ok(None);
        }
        return Err(SourceError::Api {
            provider: PROVIDER,
            message,
        });
    }

    let title = movie
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| SourceError::invalid(PROVIDER, "missing Title"))?;
    let raw_year = movie
        .year
        .ok_or_else(|| SourceError::invalid(PROVIDER, "missing Year"))?;
    let year = parse_year(&raw_year)
        .ok_or_else(|| SourceError::invalid(PROVIDER, format!("unparseable Year '{}'", raw_year)))?;

    let poster_url = movie
        .poster
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty() && p != NOT_AVAILABLE);

    Ok(Some(MovieMetadata {
        title,
        year,
        ratings: movie
            .ratings
            .into_iter()
            .map(|r| RawRatingEntry::new(r.source, r.value))
            .collect(),
        country: movie.country.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        poster_url,
        imdb_id: movie.imdb_id.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INCEPTION: &str = r#"{
        "Title": "Inception",
        "Year": "2010",
        "Rated": "PG-13",
        "Country": "United States, United Kingdom",
        "Poster": "https://m.media-amazon.com/images/M/inception.jpg",
        "Ratings": [
            {"Source": "Internet Movie Database", "Value": "8.8/10"},
            {"Source": "Rotten Tomatoes", "Value": "87%"},
            {"Source": "Metacritic", "Value": "74/100"}
        ],
        "imdbID": "tt1375666",
        "Type": "movie",
        "Response": "True"
    }"#;

    #[test]
    fn test_parse_full_response() {
        let metadata = parse_movie_response(INCEPTION).unwrap().unwrap();
        assert_eq!(metadata.title, "Inception");
        assert_eq!(metadata.year, 2010);
        assert_eq!(metadata.country, "United States, United Kingdom");
        assert_eq!(metadata.imdb_id, "tt1375666");
        assert_eq!(
            metadata.poster_url.as_deref(),
            Some("https://m.media-amazon.com/images/M/inception.jpg")
        );
        assert_eq!(metadata.ratings.len(), 3);
        assert_eq!(metadata.ratings[1], RawRatingEntry::new("Rotten Tomatoes", "87%"));
    }

    #[test]
    fn test_parse_not_found() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        assert!(parse_movie_response(body).unwrap().is_none());
    }

    #[test]
    fn test_parse_api_error() {
        let body = r#"{"Response":"False","Error":"Invalid API key!"}"#;
        match parse_movie_response(body) {
            Err(SourceError::Api { message, .. }) => assert_eq!(message, "Invalid API key!"),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(parse_error_message(body).as_deref(), Some("Invalid API key!"));
    }

    #[test]
    fn test_parse_poster_not_available_and_no_ratings() {
        let body = r#"{"Title":"Obscure","Year":"1971","Country":"France","Poster":"N/A","imdbID":"tt0000001","Response":"True"}"#;
        let metadata = parse_movie_response(body).unwrap().unwrap();
        assert_eq!(metadata.poster_url, None);
        assert!(metadata.ratings.is_empty());
    }

    #[test]
    fn test_parse_series_year_range() {
        assert_eq!(parse_year("2010–2014"), Some(2010));
        assert_eq!(parse_year("2019–"), Some(2019));
        assert_eq!(parse_year(" 1999 "), Some(1999));
        assert_eq!(parse_year("N/A"), None);
    }

    #[test]
    fn test_parse_rejects_bad_year() {
        let body = r#"{"Title":"X","Year":"N/A","Response":"True"}"#;
        assert!(matches!(
            parse_movie_response(body),
            Err(SourceError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(
            parse_movie_response("<html>"),
            Err(SourceError::InvalidResponse { .. })
        ));
        assert_eq!(parse_error_message("<html>"), None);
        assert_eq!(parse_error_message(INCEPTION), None);
    }
}
