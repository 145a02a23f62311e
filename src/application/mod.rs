//! Application layer with services and use cases.

/// List page services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use services::{FeedFilter, PostQuery, SortOrder};
pub use use_cases::{FeedPreloadOutcome, PreloadFeedImagesUseCase};
