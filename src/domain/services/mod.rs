//! Pure domain services.

/// HTML text and image helpers.
pub mod html_preview;

pub use html_preview::{extract_image_sources, preview_text, strip_html};
