//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Feed snapshot loading.
pub mod feed;
/// Image preloading and HTTP fetching.
pub mod image;
/// Fuzzy search over posts.
pub mod search;

pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
pub use feed::load_feed;
pub use image::{BatchOptions, HttpImageFetcher, ImagePreloader, LazyPreload, PreloadConfig};
pub use search::FuzzySearcher;
