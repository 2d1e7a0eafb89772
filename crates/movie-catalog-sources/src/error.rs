use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{provider} returned HTTP {status}")]
    Status { provider: &'static str, status: u16 },
    #[error("{provider} error: {message}")]
    Api { provider: &'static str, message: String },
    #[error("invalid response from {provider}: {reason}")]
    InvalidResponse { provider: &'static str, reason: String },
    #[error("no OMDb API key configured (set OMDB_API_KEY or run 'reelcase config omdb --api-key <key>')")]
    MissingApiKey,
}

impl SourceError {
    pub fn invalid(provider: &'static str, reason: impl Into<String>) -> Self {
        SourceError::InvalidResponse {
            provider,
            reason: reason.into(),
        }
    }
}
