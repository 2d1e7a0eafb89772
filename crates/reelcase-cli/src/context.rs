use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use movie_catalog_config::{Config, CredentialStore, PathManager};
use movie_catalog_core::{CollectionStore, MovieLibrary};
use movie_catalog_models::{MovieMetadata, UserRecord};
use movie_catalog_sources::{create_flag_lookup, create_provider, FlagLookup, MetadataProvider, SourceError};
use tracing::debug;

/// Resolved paths and configuration shared by every command
pub struct AppContext {
    pub paths: PathManager,
    pub config_path: PathBuf,
    pub config: Config,
}

/// Stands in for OMDb when no API key is configured, so commands that
/// never fetch still work
struct UnconfiguredProvider;

#[async_trait]
impl MetadataProvider for UnconfiguredProvider {
    fn provider_name(&self) -> &str {
        "unconfigured"
    }

    async fn fetch_movie(&self, _title: &str) -> Result<Option<MovieMetadata>, SourceError> {
        Err(SourceError::MissingApiKey)
    }
}

impl AppContext {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let paths = PathManager::default();
        let config_path = config_override.unwrap_or_else(|| paths.config_file());

        let config = Config::load_or_default(&config_path)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_path.display(), e))?;
        config
            .validate()
            .wrap_err_with(|| format!("Invalid configuration in {}", config_path.display()))?;

        Ok(Self {
            paths,
            config_path,
            config,
        })
    }

    pub fn credentials(&self) -> Result<CredentialStore> {
        let mut store = CredentialStore::new(self.paths.credentials_file());
        store
            .load()
            .map_err(|e| eyre!("Failed to load credentials: {}", e))?;
        Ok(store)
    }

    pub fn open_store(&self) -> Result<CollectionStore> {
        let path = self.config.database_path(&self.paths);
        CollectionStore::open(&path)
            .wrap_err_with(|| format!("Failed to open database at {}", path.display()))
    }

    pub fn provider(&self) -> Result<Arc<dyn MetadataProvider>> {
        match create_provider(&self.config, &self.credentials()?) {
            Ok(provider) => Ok(provider),
            Err(SourceError::MissingApiKey) => {
                debug!("No OMDb API key configured; adding movies is disabled");
                Ok(Arc::new(UnconfiguredProvider))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn open_library(&self) -> Result<MovieLibrary> {
        Ok(MovieLibrary::new(self.open_store()?, self.provider()?))
    }

    pub fn flag_lookup(&self) -> Result<Option<FlagLookup>> {
        Ok(create_flag_lookup(&self.config)?)
    }
}

/// Find a user by name with a helpful error when missing
pub fn require_user(store: &CollectionStore, name: &str) -> Result<UserRecord> {
    store
        .find_user(name)?
        .ok_or_else(|| eyre!("No user named '{}'. Create one with 'reelcase users add {}'", name.trim(), name.trim()))
}
