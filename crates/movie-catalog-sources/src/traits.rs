use async_trait::async_trait;
use movie_catalog_models::MovieMetadata;

use crate::error::SourceError;

/// A third-party film database that can be queried by title
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    /// Look up a movie by title.
    ///
    /// `Ok(None)` means the provider answered but has no such movie.
    async fn fetch_movie(&self, title: &str) -> Result<Option<MovieMetadata>, SourceError>;
}
