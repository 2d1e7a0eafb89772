//! Collection statistics over normalized ratings.
//!
//! Movies without a rating are ignored; a collection with no rated movies
//! is treated as empty.

use movie_catalog_models::MovieRecord;
use serde::Serialize;

use crate::error::CoreError;
use crate::rating::round2;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CollectionStats {
    pub total_movies: usize,
    pub rated_movies: usize,
    pub average: f64,
    pub median: f64,
    pub best: Vec<(String, f64)>,
    pub worst: Vec<(String, f64)>,
}

/// Ratings of all rated movies, in collection order
pub fn ratings(movies: &[MovieRecord]) -> Vec<f64> {
    movies.iter().filter_map(|m| m.rating).collect()
}

fn non_empty(movies: &[MovieRecord]) -> Result<Vec<f64>, CoreError> {
    let values = ratings(movies);
    if values.is_empty() {
        Err(CoreError::EmptyCollection)
    } else {
        Ok(values)
    }
}

pub fn average_rating(movies: &[MovieRecord]) -> Result<f64, CoreError> {
    let values = non_empty(movies)?;
    Ok(round2(values.iter().sum::<f64>() / values.len() as f64))
}

pub fn median_rating(movies: &[MovieRecord]) -> Result<f64, CoreError> {
    let mut values = non_empty(movies)?;
    values.sort_by(|a, b| a.total_cmp(b));

    let mid = values.len() / 2;
    let median = if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    };
    Ok(round2(median))
}

fn movies_rated(movies: &[MovieRecord], target: f64) -> Vec<(String, f64)> {
    movies
        .iter()
        .filter_map(|m| match m.rating {
            Some(r) if r == target => Some((m.title.clone(), r)),
            _ => None,
        })
        .collect()
}

/// Every movie sharing the highest rating, as (title, rating)
pub fn best_movies(movies: &[MovieRecord]) -> Result<Vec<(String, f64)>, CoreError> {
    let max = non_empty(movies)?
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);
    Ok(movies_rated(movies, max))
}

/// Every movie sharing the lowest rating, as (title, rating)
pub fn worst_movies(movies: &[MovieRecord]) -> Result<Vec<(String, f64)>, CoreError> {
    let min = non_empty(movies)?
        .into_iter()
        .fold(f64::INFINITY, f64::min);
    Ok(movies_rated(movies, min))
}

pub fn summarize(movies: &[MovieRecord]) -> Result<CollectionStats, CoreError> {
    Ok(CollectionStats {
        total_movies: movies.len(),
        rated_movies: ratings(movies).len(),
        average: average_rating(movies)?,
        median: median_rating(movies)?,
        best: best_movies(movies)?,
        worst: worst_movies(movies)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, rating: Option<f64>) -> MovieRecord {
        MovieRecord {
            id: 0,
            user_id: 1,
            title: title.to_string(),
            year: 2000,
            rating,
            note: None,
            country: "Italy".to_string(),
            poster_url: None,
            imdb_id: "tt0".to_string(),
        }
    }

    fn collection(ratings: &[(&str, f64)]) -> Vec<MovieRecord> {
        ratings.iter().map(|(t, r)| movie(t, Some(*r))).collect()
    }

    #[test]
    fn test_average_and_median() {
        let movies = collection(&[("A", 70.0), ("B", 80.0), ("C", 90.0)]);
        assert_eq!(average_rating(&movies), Ok(80.0));
        assert_eq!(median_rating(&movies), Ok(80.0));
    }

    #[test]
    fn test_median_even_count() {
        let movies = collection(&[("A", 90.0), ("B", 60.0), ("C", 70.0), ("D", 85.0)]);
        assert_eq!(median_rating(&movies), Ok(77.5));
    }

    #[test]
    fn test_average_rounds() {
        let movies = collection(&[("A", 70.0), ("B", 70.0), ("C", 71.0)]);
        assert_eq!(average_rating(&movies), Ok(70.33));
    }

    #[test]
    fn test_best_and_worst() {
        let movies = collection(&[("A", 70.0), ("B", 80.0), ("C", 90.0)]);
        assert_eq!(best_movies(&movies), Ok(vec![("C".to_string(), 90.0)]));
        assert_eq!(worst_movies(&movies), Ok(vec![("A".to_string(), 70.0)]));
    }

    #[test]
    fn test_best_includes_ties_in_order() {
        let movies = collection(&[("Heat", 90.0), ("Alien", 70.0), ("Ran", 90.0)]);
        assert_eq!(
            best_movies(&movies),
            Ok(vec![("Heat".to_string(), 90.0), ("Ran".to_string(), 90.0)])
        );
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(average_rating(&[]), Err(CoreError::EmptyCollection));
        assert_eq!(median_rating(&[]), Err(CoreError::EmptyCollection));
        assert_eq!(best_movies(&[]), Err(CoreError::EmptyCollection));
        assert_eq!(worst_movies(&[]), Err(CoreError::EmptyCollection));
        assert_eq!(summarize(&[]), Err(CoreError::EmptyCollection));
    }

    #[test]
    fn test_unrated_movies_are_ignored() {
        let movies = vec![movie("A", Some(60.0)), movie("B", None), movie("C", Some(80.0))];
        assert_eq!(average_rating(&movies), Ok(70.0));
        assert_eq!(worst_movies(&movies), Ok(vec![("A".to_string(), 60.0)]));

        let unrated = vec![movie("X", None)];
        assert_eq!(average_rating(&unrated), Err(CoreError::EmptyCollection));
    }

    #[test]
    fn test_summarize() {
        let movies = vec![movie("A", Some(70.0)), movie("B", Some(90.0)), movie("C", None)];
        let stats = summarize(&movies).unwrap();
        assert_eq!(stats.total_movies, 3);
        assert_eq!(stats.rated_movies, 2);
        assert_eq!(stats.average, 80.0);
        assert_eq!(stats.median, 80.0);
        assert_eq!(stats.best, vec![("B".to_string(), 90.0)]);
        assert_eq!(stats.worst, vec![("A".to_string(), 70.0)]);
    }
}
