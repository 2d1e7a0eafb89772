use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::paths::PathManager;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be an http(s) URL, got '{value}'")]
    InvalidUrl { field: &'static str, value: String },
    #[error("omdb.timeout_secs must be greater than zero")]
    ZeroTimeout,
    #[error("omdb.plot must be 'short' or 'full', got '{0}'")]
    InvalidPlot(String),
    #[error("server.bind is not a socket address: '{0}'")]
    InvalidBind(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub flags: FlagsConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OmdbConfig {
    #[serde(default = "default_omdb_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// "short" or "full"
    #[serde(default = "default_plot")]
    pub plot: String,
}

/// Country flag lookup used by the generated website
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlagsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_flags_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// Defaults to `<data dir>/movies.db`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SiteConfig {
    /// Defaults to `<data dir>/site`
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// HTML template containing the `__TEMPLATE_MOVIE_GRID__` placeholder; built-in template when unset
    #[serde(default)]
    pub template: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Write logs to this file (rotated daily) instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_omdb_base_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_flags_base_url() -> String {
    "https://restcountries.com/v3.1/name/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_plot() -> String {
    "short".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_omdb_base_url(),
            timeout_secs: default_timeout_secs(),
            plot: default_plot(),
        }
    }
}

impl Default for FlagsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_flags_base_url(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("omdb.base_url", &self.omdb.base_url)?;
        if self.flags.enabled {
            check_url("flags.base_url", &self.flags.base_url)?;
        }
        if self.omdb.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if !matches!(self.omdb.plot.as_str(), "short" | "full") {
            return Err(ConfigError::InvalidPlot(self.omdb.plot.clone()));
        }
        self.bind_addr()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind
            .parse()
            .map_err(|_| ConfigError::InvalidBind(self.server.bind.clone()))
    }

    pub fn database_path(&self, paths: &PathManager) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| paths.database_file())
    }

    pub fn site_output_dir(&self, paths: &PathManager) -> PathBuf {
        self.site
            .output_dir
            .clone()
            .unwrap_or_else(|| paths.site_dir())
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.omdb.timeout_secs = 3;
        config.database.path = Some(PathBuf::from("/tmp/movies.db"));
        config.server.bind = "0.0.0.0:8080".to_string();

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[omdb]\nplot = \"full\"\n").unwrap();

        let loaded = Config::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.omdb.plot, "full");
        assert_eq!(loaded.omdb.timeout_secs, 10);
        assert_eq!(loaded.omdb.base_url, "http://www.omdbapi.com/");
        assert!(loaded.flags.enabled);
        assert_eq!(loaded.server.bind, "127.0.0.1:5000");
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let loaded = Config::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.omdb.timeout_secs = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
        config.omdb.timeout_secs = 10;

        config.omdb.plot = "medium".to_string();
        assert_eq!(config.validate(), Err(ConfigError::InvalidPlot("medium".to_string())));
        config.omdb.plot = "short".to_string();

        config.omdb.base_url = "ftp://omdb".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { field: "omdb.base_url", .. })));
        config.omdb.base_url = default_omdb_base_url();

        config.server.bind = "localhost".to_string();
        assert_eq!(config.validate(), Err(ConfigError::InvalidBind("localhost".to_string())));
    }

    #[test]
    fn test_disabled_flags_skip_url_check() {
        let mut config = Config::default();
        config.flags.enabled = false;
        config.flags.base_url = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_path_defaults() {
        let paths = PathManager::with_base(PathBuf::from("/home/ed/.config/reelcase"));
        let mut config = Config::default();
        assert_eq!(config.database_path(&paths), paths.database_file());
        assert_eq!(config.site_output_dir(&paths), paths.site_dir());

        config.database.path = Some(PathBuf::from("/data/m.db"));
        assert_eq!(config.database_path(&paths), PathBuf::from("/data/m.db"));
    }
}
