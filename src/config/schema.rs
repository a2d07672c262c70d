//! Configuration schema for tfvc-cache
//!
//! Configuration is stored at `~/.config/tfvc-cache/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Revision content cache settings
    pub content: ContentConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Revision content cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Maximum number of cached revisions (0 = unbounded)
    pub max_entries: usize,

    /// Maximum total size of cached content in MB (0 = unbounded)
    pub max_total_mb: u64,

    /// Directory to create the cache directory in (system temp dir if unset)
    pub temp_parent: Option<PathBuf>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_entries: 512,
            max_total_mb: 256,
            temp_parent: None,
        }
    }
}
