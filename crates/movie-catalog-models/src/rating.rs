use serde::{Deserialize, Serialize};

/// A rating as returned by a metadata provider, before normalization.
///
/// `value` keeps the provider's own scale, e.g. "8.8/10", "87%" or "74/100".
/// Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawRatingEntry {
    pub source: String,
    pub value: String,
}

impl RawRatingEntry {
    pub fn new(source: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            value: value.into(),
        }
    }
}
