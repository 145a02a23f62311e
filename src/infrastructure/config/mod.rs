//! Application configuration.

/// Config file model.
pub mod app_config;
/// Command-line flags.
pub mod args;
/// Config file loading.
pub mod storage;

pub use app_config::{AppConfig, FeedConfig, FeedSortMode, LogLevel};
pub use args::CliArgs;
pub use storage::{ConfigError, StorageManager};
