pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, ConfigError, DatabaseConfig, FlagsConfig, LoggingConfig, OmdbConfig, ServerConfig, SiteConfig};
pub use credentials::{CredentialStore, OMDB_API_KEY_ENV};
pub use paths::{PathManager, home_override};
