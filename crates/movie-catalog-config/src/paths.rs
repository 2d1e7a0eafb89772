use anyhow::Result;
use std::path::{Path, PathBuf};

/// Base directory override, e.g. for containers or tests
pub fn home_override() -> Option<PathBuf> {
    std::env::var("REELCASE_HOME")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

#[derive(Debug, Clone)]
pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("reelcase");

        Ok(Self::with_base(base_dir))
    }

    /// Config files at the base level, data and logs in subdirectories
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join("movies.db")
    }

    pub fn site_dir(&self) -> PathBuf {
        self.data_dir.join("site")
    }

    pub fn server_log_file(&self) -> PathBuf {
        self.log_dir.join("reelcase.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = home_override() {
            return Self::with_base(base);
        }

        // Platform-specific paths (e.g., ~/.config/reelcase on Linux), falling back to the working directory
        Self::new().unwrap_or_else(|_| Self::with_base(PathBuf::from(".reelcase")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_under_base() {
        let paths = PathManager::with_base(PathBuf::from("/srv/reelcase"));
        assert_eq!(paths.config_file(), PathBuf::from("/srv/reelcase/config.toml"));
        assert_eq!(paths.credentials_file(), PathBuf::from("/srv/reelcase/credentials.toml"));
        assert_eq!(paths.database_file(), PathBuf::from("/srv/reelcase/data/movies.db"));
        assert_eq!(paths.site_dir(), PathBuf::from("/srv/reelcase/data/site"));
        assert_eq!(paths.server_log_file(), PathBuf::from("/srv/reelcase/logs/reelcase.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path().join("home"));
        paths.ensure_directories().unwrap();
        assert!(paths.config_dir().is_dir());
        assert!(paths.data_dir().is_dir());
        assert!(paths.log_dir().is_dir());
    }
}
