//! Domain layer with core entities, pure services and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Pure domain services.
pub mod services;

pub use entities::{FetchPriority, LoadedImage, Post, PreloadStats};
pub use errors::{FeedError, PreloadError};
pub use ports::ImageFetchPort;
