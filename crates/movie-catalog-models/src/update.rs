use serde::{Deserialize, Serialize};

/// The fields of a stored movie that may be changed after insertion.
///
/// Unset fields are left untouched. `note: Some(None)` clears the note,
/// `rating: Some(None)` marks the rating as unavailable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieUpdate {
    pub note: Option<Option<String>>,
    pub rating: Option<Option<f64>>,
}

impl MovieUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = Some(note);
        self
    }

    pub fn rating(mut self, rating: Option<f64>) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.note.is_none() && self.rating.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let update = MovieUpdate::new().note(Some("seen twice".to_string()));
        assert_eq!(update.note, Some(Some("seen twice".to_string())));
        assert_eq!(update.rating, None);
        assert!(!update.is_empty());
        assert!(MovieUpdate::new().is_empty());
    }
}
