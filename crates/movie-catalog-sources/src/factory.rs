// Builds provider handles from configuration and stored credentials.

use movie_catalog_config::{Config, CredentialStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::SourceError;
use crate::flags::FlagLookup;
use crate::omdb::OmdbClient;
use crate::traits::MetadataProvider;

/// Create the metadata provider; fails when no API key is available
pub fn create_provider(
    config: &Config,
    credentials: &CredentialStore,
) -> Result<Arc<dyn MetadataProvider>, SourceError> {
    let api_key = credentials
        .resolve_omdb_api_key()
        .ok_or(SourceError::MissingApiKey)?;
    let client = OmdbClient::new(api_key, &config.omdb)?;
    debug!(base_url = client.base_url(), "Created OMDb provider");
    Ok(Arc::new(client))
}

/// Create the flag lookup, `None` when disabled in configuration
pub fn create_flag_lookup(config: &Config) -> Result<Option<FlagLookup>, SourceError> {
    if !config.flags.enabled {
        return Ok(None);
    }
    FlagLookup::new(&config.flags, Duration::from_secs(config.omdb.timeout_secs)).map(Some)
}
