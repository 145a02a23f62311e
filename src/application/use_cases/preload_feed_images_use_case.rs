//! Feed image preload use case.

use std::time::Duration;

use tracing::{debug, info};

use crate::domain::entities::{LoadedImage, Post};
use crate::infrastructure::image::{ImagePreloader, LazyPreload};

/// What the preload use case started.
#[derive(Debug)]
pub struct FeedPreloadOutcome {
    /// Images loaded for the critical tier.
    pub critical: Vec<LoadedImage>,
    /// The deferred lazy tier.
    pub lazy: LazyPreload,
}

/// Warms the image cache for a freshly fetched list page.
#[derive(Debug, Clone)]
pub struct PreloadFeedImagesUseCase {
    preloader: ImagePreloader,
    lazy_delay: Duration,
}

impl PreloadFeedImagesUseCase {
    /// Creates the use case with the preloader's configured lazy delay.
    #[must_use]
    pub fn new(preloader: ImagePreloader) -> Self {
        let lazy_delay = preloader.config().lazy_delay();
        Self {
            preloader,
            lazy_delay,
        }
    }

    /// Overrides the lazy tier delay.
    #[must_use]
    pub const fn with_lazy_delay(mut self, delay: Duration) -> Self {
        self.lazy_delay = delay;
        self
    }

    /// Collects one card image per post, in list order, without duplicates.
    #[must_use]
    pub fn image_urls(posts: &[Post]) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        for url in posts.iter().filter_map(Post::primary_image) {
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        urls
    }

    /// Loads the critical tier, then schedules the rest without waiting.
    pub async fn execute(&self, posts: &[Post]) -> FeedPreloadOutcome {
        let urls = Self::image_urls(posts);
        debug!(posts = posts.len(), images = urls.len(), "Preloading feed images");

        let critical = self.preloader.preload_critical(&urls).await;
        let lazy = self.preloader.preload_lazy_after(&urls, self.lazy_delay);

        info!(
            critical = critical.len(),
            deferred = lazy.scheduled(),
            "Feed images preloading"
        );

        FeedPreloadOutcome { critical, lazy }
    }
}
