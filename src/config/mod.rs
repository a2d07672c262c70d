//! Settings for the tfvc-cache CLI
//!
//! One TOML file, by default `<config dir>/tfvc-cache/config.toml`, with a
//! `[general]` section for log output and a `[content]` section sizing the
//! revision content cache. `--config` or `TFVC_CACHE_CONFIG` points
//! elsewhere. A missing file means all defaults.

pub mod schema;

pub use schema::{Config, ContentConfig, GeneralConfig};

use crate::error::{CacheError, CacheResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Reads and writes the settings file at one location
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the per-user settings file
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Manager for the settings file at `path` (from `--config`)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// `<config dir>/tfvc-cache/config.toml`, or `./tfvc-cache/config.toml`
    /// when the platform has no config dir
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tfvc-cache")
            .join("config.toml")
    }

    /// Read the settings; a missing file yields the defaults
    pub async fn load(&self) -> CacheResult<Config> {
        if !self.config_path.exists() {
            debug!(
                "No settings at {}, using defaults",
                self.config_path.display()
            );
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Read the settings from `path`
    ///
    /// Unparseable TOML, mistyped values and unknown log formats become
    /// `ConfigInvalid`, so the caller can suggest `config init --force`.
    pub async fn load_from_file(&self, path: &Path) -> CacheResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| CacheError::io(format!("reading config from {}", path.display()), e))?;

        let invalid = |reason: String| CacheError::ConfigInvalid {
            path: path.to_path_buf(),
            reason,
        };

        let config: Config = toml::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        if !matches!(config.general.log_format.as_str(), "text" | "json") {
            return Err(invalid(format!(
                "general.log_format must be \"text\" or \"json\", not {:?}",
                config.general.log_format
            )));
        }
        Ok(config)
    }

    /// Write `config` back as pretty TOML, creating parent directories
    pub async fn save(&self, config: &Config) -> CacheResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            CacheError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Settings written to {}", self.config_path.display());
        Ok(())
    }

    async fn ensure_config_dir(&self) -> CacheResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Location of the settings file
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.general.log_format, "text");
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.content.max_entries = 7;

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.content.max_entries, 7);
    }

    #[tokio::test]
    async fn invalid_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[content]\nmax_entries = \"many\"\n").unwrap();

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        assert!(matches!(err, CacheError::ConfigInvalid { .. }));
    }

    #[tokio::test]
    async fn unknown_log_format_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[general]\nlog_format = \"xml\"\n").unwrap();

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }
}
