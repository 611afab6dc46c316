//! Application configuration for kbload.
//!
//! User config lives at `~/.kbload/kbload.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KbLoadError, Result};
use crate::types::DEFAULT_DELIMITER;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "kbload.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".kbload";

// ---------------------------------------------------------------------------
// Config structs (matching kbload.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database location.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Input parsing settings.
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// `[database]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file. A leading `~/` expands to home.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "~/.kbload/kbload.db".into()
}

/// `[loader]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Literal separator between key and value on each input line.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.into()
}

impl AppConfig {
    /// Check values that serde cannot enforce.
    ///
    /// `database.path` is checked by [`AppConfig::database_path`] instead,
    /// since `--db` may replace it.
    pub fn validate(&self) -> Result<()> {
        if self.loader.delimiter.is_empty() {
            return Err(KbLoadError::validation("loader.delimiter must not be empty"));
        }
        Ok(())
    }

    /// Resolve the configured database path, expanding `~/`.
    pub fn database_path(&self) -> Result<PathBuf> {
        let raw = self.database.path.trim();
        if raw.is_empty() {
            return Err(KbLoadError::validation("database.path must not be empty"));
        }
        expand_home(raw)
    }
}

fn expand_home(raw: &str) -> Result<PathBuf> {
    match raw.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir()
                .ok_or_else(|| KbLoadError::config("could not determine home directory"))?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(raw)),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.kbload/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| KbLoadError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.kbload/kbload.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| KbLoadError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        KbLoadError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}
