//! Feed loading error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a feed snapshot.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum FeedError {
    #[error("failed to read feed {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed feed {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl FeedError {
    /// Returns the path of the feed that failed.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Malformed { path, .. } => path,
        }
    }
}
