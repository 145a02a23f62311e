//! Use case implementations.

mod preload_feed_images_use_case;

pub use preload_feed_images_use_case::{FeedPreloadOutcome, PreloadFeedImagesUseCase};
