//! Sorting, filtering and sampling over a user's collection.

use std::cmp::Ordering;

use movie_catalog_models::MovieRecord;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::stats::ratings;
use crate::store::title_key;

pub const DEFAULT_HISTOGRAM_BINS: usize = 5;
pub const MAX_HISTOGRAM_BINS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Open-ended bounds; `None` means unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieFilter {
    pub min_rating: Option<f64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

impl MovieFilter {
    pub fn matches(&self, movie: &MovieRecord) -> bool {
        if let Some(min) = self.min_rating {
            match movie.rating {
                Some(rating) if rating >= min => {}
                _ => return false,
            }
        }
        if self.min_year.is_some_and(|min| movie.year < min) {
            return false;
        }
        if self.max_year.is_some_and(|max| movie.year > max) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

fn by_title(a: &MovieRecord, b: &MovieRecord) -> Ordering {
    a.title.to_lowercase().cmp(&b.title.to_lowercase())
}

/// Highest rated first, unrated movies last
pub fn sort_by_rating(movies: &[MovieRecord]) -> Vec<&MovieRecord> {
    let mut sorted: Vec<&MovieRecord> = movies.iter().collect();
    sorted.sort_by(|a, b| {
        let by_rating = match (a.rating, b.rating) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_rating.then_with(|| by_title(a, b))
    });
    sorted
}

pub fn sort_by_year(movies: &[MovieRecord], order: SortOrder) -> Vec<&MovieRecord> {
    let mut sorted: Vec<&MovieRecord> = movies.iter().collect();
    sorted.sort_by(|a, b| {
        let by_year = match order {
            SortOrder::Ascending => a.year.cmp(&b.year),
            SortOrder::Descending => b.year.cmp(&a.year),
        };
        by_year.then_with(|| by_title(a, b))
    });
    sorted
}

pub fn filter_movies<'a>(movies: &'a [MovieRecord], filter: &MovieFilter) -> Vec<&'a MovieRecord> {
    movies.iter().filter(|m| filter.matches(m)).collect()
}

pub fn random_movie<'a, R: Rng + ?Sized>(
    movies: &'a [MovieRecord],
    rng: &mut R,
) -> Option<&'a MovieRecord> {
    movies.choose(rng)
}

/// Case-insensitive exact title lookup
pub fn find_by_title<'a>(movies: &'a [MovieRecord], title: &str) -> Option<&'a MovieRecord> {
    let wanted = title_key(title);
    movies.iter().find(|m| title_key(&m.title) == wanted)
}

/// Equal-width histogram over the rated movies.
///
/// Bins span the observed min..=max; the maximum falls into the last bin.
pub fn rating_histogram(movies: &[MovieRecord], bins: usize) -> Result<Vec<HistogramBin>, CoreError> {
    if bins == 0 {
        return Err(CoreError::InvalidArgument(
            "histogram needs at least one bin".to_string(),
        ));
    }
    if bins > MAX_HISTOGRAM_BINS {
        return Err(CoreError::InvalidArgument(format!(
            "histogram supports at most {} bins, got {}",
            MAX_HISTOGRAM_BINS, bins
        )));
    }

    let values = ratings(movies);
    if values.is_empty() {
        return Err(CoreError::EmptyCollection);
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return Ok(vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }]);
    }

    let width = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for value in values {
        let index = (((value - min) / width).floor() as usize).min(bins - 1);
        histogram[index].count += 1;
    }

    Ok(histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn movie(title: &str, year: i32, rating: Option<f64>) -> MovieRecord {
        MovieRecord {
            id: 0,
            user_id: 1,
            title: title.to_string(),
            year,
            rating,
            note: None,
            country: "France".to_string(),
            poster_url: None,
            imdb_id: "tt0".to_string(),
        }
    }

    fn titles(movies: &[&MovieRecord]) -> Vec<String> {
        movies.iter().map(|m| m.title.clone()).collect()
    }

    fn sample() -> Vec<MovieRecord> {
        vec![
            movie("Heat", 1995, Some(83.0)),
            movie("Alien", 1979, Some(85.0)),
            movie("Brazil", 1985, None),
            movie("Amelie", 2001, Some(83.0)),
            movie("Ran", 1985, Some(88.0)),
        ]
    }

    #[test]
    fn test_sort_by_rating() {
        let movies = sample();
        let sorted = sort_by_rating(&movies);
        assert_eq!(titles(&sorted), vec!["Ran", "Alien", "Amelie", "Heat", "Brazil"]);
    }

    #[test]
    fn test_sort_by_year_both_orders() {
        let movies = sample();
        let asc = sort_by_year(&movies, SortOrder::Ascending);
        assert_eq!(titles(&asc), vec!["Alien", "Brazil", "Ran", "Heat", "Amelie"]);

        let desc = sort_by_year(&movies, SortOrder::Descending);
        assert_eq!(titles(&desc), vec!["Amelie", "Heat", "Brazil", "Ran", "Alien"]);
    }

    #[test]
    fn test_filter_bounds() {
        let movies = sample();

        let all = filter_movies(&movies, &MovieFilter::default());
        assert_eq!(all.len(), 5);

        let rated = filter_movies(
            &movies,
            &MovieFilter {
                min_rating: Some(84.0),
                ..Default::default()
            },
        );
        assert_eq!(titles(&rated), vec!["Alien", "Ran"]);

        let eighties = filter_movies(
            &movies,
            &MovieFilter {
                min_year: Some(1980),
                max_year: Some(1989),
                ..Default::default()
            },
        );
        assert_eq!(titles(&eighties), vec!["Brazil", "Ran"]);
    }

    #[test]
    fn test_min_rating_excludes_unrated() {
        let movies = vec![movie("Brazil", 1985, None)];
        let filter = MovieFilter {
            min_rating: Some(0.0),
            ..Default::default()
        };
        assert!(filter_movies(&movies, &filter).is_empty());
    }

    #[test]
    fn test_random_movie() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(random_movie(&[], &mut rng).is_none());

        let movies = sample();
        for _ in 0..20 {
            let picked = random_movie(&movies, &mut rng).unwrap();
            assert!(movies.iter().any(|m| m.title == picked.title));
        }
    }

    #[test]
    fn test_find_by_title_ignores_case() {
        let movies = sample();
        assert_eq!(find_by_title(&movies, "  heat ").map(|m| m.year), Some(1995));
        assert!(find_by_title(&movies, "Heat 2").is_none());
    }

    #[test]
    fn test_histogram_equal_width() {
        let movies = vec![
            movie("A", 2000, Some(50.0)),
            movie("B", 2000, Some(60.0)),
            movie("C", 2000, Some(75.0)),
            movie("D", 2000, Some(100.0)),
            movie("E", 2000, None),
        ];
        let bins = rating_histogram(&movies, 5).unwrap();
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].lower, 50.0);
        assert_eq!(bins[4].upper, 100.0);
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 0, 1]);
        assert_eq!(counts.iter().sum::<usize>(), 4);
    }

    #[test]
    fn test_histogram_single_value() {
        let movies = vec![movie("A", 2000, Some(70.0)), movie("B", 2000, Some(70.0))];
        let bins = rating_histogram(&movies, 5).unwrap();
        assert_eq!(
            bins,
            vec![HistogramBin {
                lower: 70.0,
                upper: 70.0,
                count: 2
            }]
        );
    }

    #[test]
    fn test_histogram_errors() {
        assert_eq!(rating_histogram(&[], 5), Err(CoreError::EmptyCollection));
        let movies = sample();
        assert!(matches!(
            rating_histogram(&movies, 0),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_histogram_rejects_too_many_bins() {
        let movies = vec![movie("A", 2000, Some(50.0)), movie("B", 2000, Some(90.0))];
        assert!(matches!(
            rating_histogram(&movies, usize::MAX),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            rating_histogram(&movies, MAX_HISTOGRAM_BINS + 1),
            Err(CoreError::InvalidArgument(_))
        ));
        assert_eq!(rating_histogram(&movies, MAX_HISTOGRAM_BINS).unwrap().len(), MAX_HISTOGRAM_BINS);
    }
}
