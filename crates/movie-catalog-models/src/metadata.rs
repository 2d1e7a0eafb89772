use serde::{Deserialize, Serialize};

use crate::movie::NewMovie;
use crate::rating::RawRatingEntry;

/// Movie metadata as returned by a metadata provider, ratings still in provider scales
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieMetadata {
    pub title: String,
    pub year: i32,
    pub ratings: Vec<RawRatingEntry>,
    pub country: String,
    pub poster_url: Option<String>,
    pub imdb_id: String,
}

impl MovieMetadata {
    /// Build the insertable record once the ratings have been normalized
    pub fn into_new_movie(self, rating: Option<f64>, note: Option<String>) -> NewMovie {
        NewMovie {
            title: self.title,
            year: self.year,
            rating,
            note,
            country: self.country,
            poster_url: self.poster_url,
            imdb_id: self.imdb_id,
        }
    }
}
