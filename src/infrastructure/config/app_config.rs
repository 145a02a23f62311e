//! Application configuration.

use chrono::format::{Item, StrftimeItems};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::services::{PopularityWeight, SortOrder};
use crate::infrastructure::image::{HttpFetcherConfig, PreloadConfig};

pub(super) const APP_NAME: &str = "lounge";
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Default list ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedSortMode {
    /// Newest first.
    #[default]
    Latest,
    /// Most liked and commented first.
    Likes,
    /// Most scrapped and commented first.
    Scraps,
}

impl From<FeedSortMode> for SortOrder {
    fn from(mode: FeedSortMode) -> Self {
        match mode {
            FeedSortMode::Latest => Self::Latest,
            FeedSortMode::Likes => Self::Popular(PopularityWeight::Likes),
            FeedSortMode::Scraps => Self::Popular(PopularityWeight::Scraps),
        }
    }
}

impl std::fmt::Display for FeedSortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Likes => write!(f, "likes"),
            Self::Scraps => write!(f, "scraps"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Feed display configuration.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Preload tier configuration.
    #[serde(default)]
    pub preload: PreloadConfig,

    /// HTTP fetcher configuration.
    #[serde(default)]
    pub http: HttpFetcherConfig,
}

/// Feed display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Default ordering.
    #[serde(default)]
    pub sort: FeedSortMode,

    /// Preview length in characters.
    #[serde(default = "default_preview_len")]
    pub preview_len: usize,

    /// Preload card images after listing.
    #[serde(default = "default_true")]
    pub preload_images: bool,

    /// Timestamp format string (chrono format).
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            sort: FeedSortMode::default(),
            preview_len: default_preview_len(),
            preload_images: true,
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl FeedConfig {
    /// Returns true when `timestamp_format` is a usable chrono format string.
    #[must_use]
    pub fn timestamp_format_is_valid(&self) -> bool {
        !StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error))
    }
}

const fn default_preview_len() -> usize {
    80
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

const fn default_true() -> bool {
    true
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(sort) = args.sort {
            self.feed.sort = sort;
        }
        if let Some(preview_len) = args.preview_len {
            self.feed.preview_len = preview_len;
        }
        if args.no_preload {
            self.feed.preload_images = false;
        }
        if let Some(lazy_delay_ms) = args.lazy_delay_ms {
            self.preload.lazy_delay_ms = lazy_delay_ms;
        }
        if let Some(timeout_secs) = args.timeout_secs {
            self.http.timeout_secs = timeout_secs;
        }
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("lounge.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            feed: FeedConfig::default(),
            preload: PreloadConfig::default(),
            http: HttpFetcherConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_config_with_sections() {
        let toml_content = r#"
            log_level = "debug"

            [feed]
            sort = "scraps"
            preview_len = 40

            [preload]
            lazy_delay_ms = 250
            lazy_max_concurrent = 4

            [http]
            timeout_secs = 5
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.feed.sort, FeedSortMode::Scraps);
        assert_eq!(config.feed.preview_len, 40);
        assert!(config.feed.preload_images); // default_true
        assert_eq!(config.preload.lazy_delay_ms, 250);
        assert_eq!(config.preload.lazy_max_concurrent, 4);
        assert_eq!(config.preload.critical_count, 3);
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.feed.sort, FeedSortMode::Latest);
        assert_eq!(config.preload, PreloadConfig::default());
        assert_eq!(config.preload.lazy_delay_ms, 1000);
        assert!(config.feed.preload_images);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").expect("Failed to parse config");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_args_override_file() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "lounge",
            "--feed",
            "feed.json",
            "--sort",
            "likes",
            "--no-preload",
            "--lazy-delay-ms",
            "0",
            "--log-level",
            "warn",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.feed.sort, FeedSortMode::Likes);
        assert!(!config.feed.preload_images);
        assert_eq!(config.preload.lazy_delay_ms, 0);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.feed.preview_len, 80);
    }

    #[test]
    fn test_timestamp_format_validation() {
        let mut feed = FeedConfig::default();
        assert!(feed.timestamp_format_is_valid());

        feed.timestamp_format = "%d/%m %!".to_string();
        assert!(!feed.timestamp_format_is_valid());
    }

    #[test]
    fn test_sort_mode_maps_to_order() {
        assert_eq!(SortOrder::from(FeedSortMode::Latest), SortOrder::Latest);
        assert_eq!(
            SortOrder::from(FeedSortMode::Scraps),
            SortOrder::Popular(PopularityWeight::Scraps)
        );
    }
}
