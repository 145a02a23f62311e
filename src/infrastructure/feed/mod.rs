//! Feed snapshot loading.
//!
//! The backend is an external service; the CLI works from a JSON snapshot of
//! what its list endpoints return.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::entities::Post;
use crate::domain::errors::FeedError;

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    Bare(Vec<Post>),
    Wrapped { posts: Vec<Post> },
}

impl FeedDocument {
    fn into_posts(self) -> Vec<Post> {
        match self {
            Self::Bare(posts) | Self::Wrapped { posts } => posts,
        }
    }
}

/// Parses a feed document: either a JSON array of posts or `{ "posts": [...] }`.
///
/// # Errors
/// Returns `serde_json::Error` if the document matches neither shape.
pub fn parse_feed(content: &str) -> Result<Vec<Post>, serde_json::Error> {
    serde_json::from_str::<FeedDocument>(content).map(FeedDocument::into_posts)
}

/// Reads and parses a feed snapshot from disk.
///
/// # Errors
/// Returns `FeedError` if the file cannot be read or parsed.
pub async fn load_feed(path: &Path) -> Result<Vec<Post>, FeedError> {
    debug!(path = %path.display(), "Reading feed snapshot");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let posts = parse_feed(&content).map_err(|source| FeedError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), count = posts.len(), "Feed loaded");
    Ok(posts)
}
