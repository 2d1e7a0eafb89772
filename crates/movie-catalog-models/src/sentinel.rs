// Absent notes and posters are stored as the literal "N/A" rather than NULL.

pub const NOT_AVAILABLE: &str = "N/A";

/// Convert an optional field to its stored form
pub fn to_stored(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() && v != NOT_AVAILABLE => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Convert a stored field back to an optional value
pub fn from_stored(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == NOT_AVAILABLE {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_stored() {
        assert_eq!(to_stored(None), "N/A");
        assert_eq!(to_stored(Some("")), "N/A");
        assert_eq!(to_stored(Some("  ")), "N/A");
        assert_eq!(to_stored(Some("N/A")), "N/A");
        assert_eq!(to_stored(Some(" great ")), "great");
    }

    #[test]
    fn test_from_stored() {
        assert_eq!(from_stored("N/A"), None);
        assert_eq!(from_stored(" N/A "), None);
        assert_eq!(from_stored(""), None);
        assert_eq!(from_stored("rewatch"), Some("rewatch".to_string()));
    }
}
