//! Domain entity definitions.

mod image;
mod post;

pub use image::{FetchPriority, LoadState, LoadedImage, PreloadStats};
pub use post::{Post, PostId};
