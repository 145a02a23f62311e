//! Domain error types.

mod feed_error;
mod preload_error;

pub use feed_error::FeedError;
pub use preload_error::PreloadError;
