//! Rating normalization.
//!
//! Providers report ratings on their own scales ("8.8/10", "87%", "74/100").
//! Everything is rescaled to 0-100 and averaged into one number per movie.

use movie_catalog_models::RawRatingEntry;
use tracing::{debug, warn};

use crate::error::CoreError;

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse_prefix(raw: &str, prefix: &str) -> Result<f64, CoreError> {
    let value: f64 = prefix.trim().parse().map_err(|e| CoreError::Format {
        value: raw.to_string(),
        reason: format!("{}", e),
    })?;
    if !value.is_finite() {
        return Err(CoreError::Format {
            value: raw.to_string(),
            reason: "not a finite number".to_string(),
        });
    }
    Ok(value)
}

fn check_scaled(raw: &str, scaled: f64) -> Result<f64, CoreError> {
    if !scaled.is_finite() || !(0.0..=100.0).contains(&scaled) {
        return Err(CoreError::Format {
            value: raw.to_string(),
            reason: format!("{} is outside 0-100", scaled),
        });
    }
    Ok(scaled)
}

/// Rescale one raw rating to 0-100.
///
/// `Ok(None)` for an unrecognized scale, `Err(Format)` for a recognized
/// scale with a malformed number or a value that falls outside 0-100.
pub fn parse_rating(raw: &str) -> Result<Option<f64>, CoreError> {
    let trimmed = raw.trim();

    let scaled = if let Some(prefix) = trimmed.strip_suffix("/100") {
        parse_prefix(raw, prefix)?
    } else if let Some(prefix) = trimmed.strip_suffix("/10") {
        parse_prefix(raw, prefix)? * 10.0
    } else if let Some(prefix) = trimmed.strip_suffix('%') {
        parse_prefix(raw, prefix)?
    } else {
        return Ok(None);
    };

    check_scaled(raw, scaled).map(Some)
}

/// Average of all usable ratings on the 0-100 scale, rounded to 2 decimals.
///
/// Unrecognized scales are dropped, malformed numbers are skipped with a
/// warning. `None` when nothing usable remains.
pub fn normalize_ratings<S: AsRef<str>>(raws: &[S]) -> Option<f64> {
    let mut normalized = Vec::with_capacity(raws.len());

    for raw in raws {
        match parse_rating(raw.as_ref()) {
            Ok(Some(value)) => normalized.push(value),
            Ok(None) => debug!(rating = raw.as_ref(), "Dropping rating with unrecognized scale"),
            Err(e) => warn!("Skipping rating: {}", e),
        }
    }

    if normalized.is_empty() {
        return None;
    }

    let mean = normalized.iter().sum::<f64>() / normalized.len() as f64;
    Some(round2(mean))
}

/// Same as [`normalize_ratings`] over provider entries
pub fn normalize_entries(entries: &[RawRatingEntry]) -> Option<f64> {
    let values: Vec<&str> = entries.iter().map(|e| e.value.as_str()).collect();
    normalize_ratings(&values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_scales() {
        assert_eq!(normalize_ratings(&["8.5/10"]), Some(85.0));
        assert_eq!(normalize_ratings(&["85/100"]), Some(85.0));
        assert_eq!(normalize_ratings(&["90%"]), Some(90.0));
    }

    #[test]
    fn test_mixed_scales_average() {
        assert_eq!(normalize_ratings(&["8.5/10", "90%"]), Some(87.5));
        // 88, 87, 74 -> 83
        assert_eq!(normalize_ratings(&["8.8/10", "87%", "74/100"]), Some(83.0));
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        // (70 + 80 + 80.5) / 3 = 76.8333..
        assert_eq!(normalize_ratings(&["7/10", "80%", "80.5/100"]), Some(76.83));
    }

    #[test]
    fn test_empty_is_unavailable() {
        let empty: [&str; 0] = [];
        assert_eq!(normalize_ratings(&empty), None);
    }

    #[test]
    fn test_unrecognized_is_unavailable() {
        assert_eq!(normalize_ratings(&["garbage"]), None);
        assert_eq!(normalize_ratings(&["4 stars", "A+"]), None);
    }

    #[test]
    fn test_unrecognized_entries_are_dropped() {
        assert_eq!(normalize_ratings(&["garbage", "60%"]), Some(60.0));
    }

    #[test]
    fn test_malformed_prefix() {
        assert!(matches!(parse_rating("abc/10"), Err(CoreError::Format { .. })));
        assert!(matches!(parse_rating("%"), Err(CoreError::Format { .. })));
        assert!(matches!(parse_rating("inf/100"), Err(CoreError::Format { .. })));
        // skipped during normalization, the rest still counts
        assert_eq!(normalize_ratings(&["abc/10", "70/100"]), Some(70.0));
        assert_eq!(normalize_ratings(&["abc/10"]), None);
    }

    #[test]
    fn test_out_of_scale_values_are_rejected() {
        for raw in ["150%", "-5/10", "1e308/10", "100.5/100", "11/10"] {
            assert!(
                matches!(parse_rating(raw), Err(CoreError::Format { .. })),
                "{} should be rejected",
                raw
            );
        }
        assert_eq!(normalize_ratings(&["150%"]), None);
        assert_eq!(normalize_ratings(&["-5/10"]), None);
        assert_eq!(normalize_ratings(&["1e308/10"]), None);
        assert_eq!(normalize_ratings(&["150%", "1e308/10", "80%"]), Some(80.0));
    }

    #[test]
    fn test_scale_bounds_are_inclusive() {
        assert_eq!(parse_rating("0/10").unwrap(), Some(0.0));
        assert_eq!(parse_rating("10/10").unwrap(), Some(100.0));
        assert_eq!(parse_rating("100%").unwrap(), Some(100.0));
    }

    #[test]
    fn test_parse_rating_whitespace() {
        assert_eq!(parse_rating(" 7.5/10 ").unwrap(), Some(75.0));
        assert_eq!(parse_rating("42 %").unwrap(), Some(42.0));
    }

    #[test]
    fn test_normalized_values_stay_in_range() {
        let inputs = [
            vec!["0/10"],
            vec!["10/10", "100%"],
            vec!["0%", "100/100", "5.5/10"],
            vec!["1/10", "junk", "99/100"],
        ];
        for input in inputs {
            let value = normalize_ratings(&input).unwrap();
            assert!((0.0..=100.0).contains(&value), "{:?} -> {}", input, value);
        }
    }

    #[test]
    fn test_already_normalized_is_idempotent() {
        for v in [0.0, 12.34, 50.0, 87.5, 100.0] {
            let raw = format!("{}/100", v);
            assert_eq!(normalize_ratings(&[raw.as_str()]), Some(v));
        }
    }

    #[test]
    fn test_normalize_entries() {
        let entries = vec![
            RawRatingEntry::new("Internet Movie Database", "8.5/10"),
            RawRatingEntry::new("Rotten Tomatoes", "90%"),
        ];
        assert_eq!(normalize_entries(&entries), Some(87.5));
        assert_eq!(normalize_entries(&[]), None);
    }
}
