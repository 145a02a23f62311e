//! Config file discovery and section-wise loading.

use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig, FeedConfig};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while locating, reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No home or config directory could be resolved.
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    /// Reading or writing the file failed.
    #[error("config file {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The defaults could not be rendered as TOML.
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl ConfigError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Finds and reads `config.toml`.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Uses the platform config directory for lounge.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Uses `path` as the config directory.
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// The file `load_config` reads: `path_override`, or `config.toml` in
    /// the config directory.
    #[must_use]
    pub fn config_path(&self, path_override: Option<&Path>) -> PathBuf {
        path_override.map_or_else(|| self.config_dir.join(CONFIG_FILE_NAME), Path::to_path_buf)
    }

    /// Loads the configuration.
    ///
    /// On first run the default configuration is written out so users have
    /// a file to edit. Each section is read on its own: an invalid `[http]`
    /// table falls back to HTTP defaults without discarding `[feed]`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the default
    /// file cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = self.config_path(path_override);

        if !path.exists() {
            info!(path = %path.display(), "Config file not found, writing defaults");
            let config = AppConfig::default();
            write_config(&path, &config)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;
        Ok(parse_config(&content))
    }
}

/// Builds an `AppConfig` from TOML text, section by section.
///
/// Unparseable text yields the defaults. A section that fails to
/// deserialize is replaced by its defaults, and an unusable timestamp
/// format is reset.
#[must_use]
pub fn parse_config(content: &str) -> AppConfig {
    let table: toml::Table = match content.parse() {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "Config file is not valid TOML, using defaults");
            return AppConfig::default();
        }
    };

    let mut config = AppConfig {
        log_level: section(&table, "log_level"),
        feed: section(&table, "feed"),
        preload: section(&table, "preload"),
        http: section(&table, "http"),
        ..AppConfig::default()
    };

    if !config.feed.timestamp_format_is_valid() {
        warn!(
            format = %config.feed.timestamp_format,
            "Invalid timestamp format, using default"
        );
        config.feed.timestamp_format = FeedConfig::default().timestamp_format;
    }

    config
}

fn section<T: DeserializeOwned + Default>(table: &toml::Table, key: &str) -> T {
    let Some(value) = table.get(key) else {
        return T::default();
    };

    value.clone().try_into().unwrap_or_else(|e| {
        warn!(section = key, error = %e, "Invalid config section, using defaults");
        T::default()
    })
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;

    let mut temp_file =
        tempfile::NamedTempFile::new_in(parent).map_err(|e| ConfigError::io(parent, e))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| ConfigError::io(path, e))?;
    temp_file
        .persist(path)
        .map_err(|e| ConfigError::io(path, e.error))?;

    Ok(())
}
