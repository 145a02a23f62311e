//! Image handling infrastructure.
//!
//! This module provides:
//! - The windowed, deduplicating preload queue
//! - The HTTP adapter that downloads and decodes images

/// HTTP image fetching.
pub mod http_fetcher;
/// Preload queue.
pub mod preloader;

pub use http_fetcher::{HttpFetcherConfig, HttpImageFetcher};
pub use preloader::{
    BatchOptions, ImagePreloader, LazyPreload, PreloadConfig, PreloadFuture, PreloadResult,
};
