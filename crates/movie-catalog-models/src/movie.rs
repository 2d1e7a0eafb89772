use serde::{Deserialize, Serialize};

/// A movie as stored in a user's collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub year: i32,
    /// Normalized to the 0-100 scale; `None` when no provider rating could be used
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Comma separated, as returned by the provider (e.g. "United States, United Kingdom")
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    pub imdb_id: String,
}

impl MovieRecord {
    /// Countries in provider order, blanks removed
    pub fn countries(&self) -> Vec<&str> {
        self.country
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != crate::NOT_AVAILABLE)
            .collect()
    }

    pub fn primary_country(&self) -> Option<&str> {
        self.countries().into_iter().next()
    }

    /// Rating formatted for display, "N/A" when unavailable
    pub fn rating_display(&self) -> String {
        match self.rating {
            Some(rating) => format!("{}", rating),
            None => crate::NOT_AVAILABLE.to_string(),
        }
    }

    pub fn imdb_url(&self) -> Option<String> {
        let id = self.imdb_id.trim();
        if id.is_empty() || id == crate::NOT_AVAILABLE {
            None
        } else {
            Some(format!("https://www.imdb.com/title/{}/", id))
        }
    }
}

/// Fields of a movie about to be inserted; id and owner are assigned by the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub rating: Option<f64>,
    pub note: Option<String>,
    pub country: String,
    pub poster_url: Option<String>,
    pub imdb_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(country: &str, imdb_id: &str) -> MovieRecord {
        MovieRecord {
            id: 1,
            user_id: 1,
            title: "Inception".to_string(),
            year: 2010,
            rating: Some(87.5),
            note: None,
            country: country.to_string(),
            poster_url: None,
            imdb_id: imdb_id.to_string(),
        }
    }

    #[test]
    fn test_countries_split() {
        let m = movie("United States, United Kingdom", "tt1375666");
        assert_eq!(m.countries(), vec!["United States", "United Kingdom"]);
        assert_eq!(m.primary_country(), Some("United States"));
    }

    #[test]
    fn test_countries_not_available() {
        let m = movie("N/A", "tt1375666");
        assert!(m.countries().is_empty());
        assert_eq!(m.primary_country(), None);
    }

    #[test]
    fn test_imdb_url() {
        assert_eq!(
            movie("France", "tt1375666").imdb_url().as_deref(),
            Some("https://www.imdb.com/title/tt1375666/")
        );
        assert_eq!(movie("France", "N/A").imdb_url(), None);
    }

    #[test]
    fn test_rating_display() {
        let mut m = movie("France", "tt1");
        assert_eq!(m.rating_display(), "87.5");
        m.rating = None;
        assert_eq!(m.rating_display(), "N/A");
    }

    #[test]
    fn test_json_omits_absent_note_and_poster() {
        let json = serde_json::to_value(movie("France", "tt1")).unwrap();
        assert!(json.get("note").is_none());
        assert!(json.get("poster_url").is_none());
        assert_eq!(json["rating"], serde_json::json!(87.5));
    }
}
