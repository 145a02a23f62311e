//! Port definition for the platform image fetch primitive.

use async_trait::async_trait;

use crate::domain::entities::{FetchPriority, LoadedImage};
use crate::domain::errors::PreloadError;

/// Fetches and decodes a single image.
/// Implementations must be thread-safe; the preloader calls them from spawned tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Fetches `url` with the given eagerness hint.
    async fn fetch(&self, url: &str, priority: FetchPriority) -> Result<LoadedImage, PreloadError>;
}
