//! Image preload error types.

use thiserror::Error;

/// Image preload error variants.
///
/// Cloneable so a single outcome can be handed to every caller that
/// coalesced onto the same load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum PreloadError {
    #[error("invalid image url: {reason}")]
    InvalidInput { reason: String },

    #[error("failed to load image {url}: {reason}")]
    LoadFailed { url: String, reason: String },
}

impl PreloadError {
    /// Creates invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates load failure error.
    #[must_use]
    pub fn load_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns the URL the failure refers to, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { .. } => None,
            Self::LoadFailed { url, .. } => Some(url),
        }
    }

    /// Returns whether a later request for the same URL may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::LoadFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = PreloadError::load_failed("https://a.com/x.png", "HTTP 404 Not Found");
        assert_eq!(
            err.to_string(),
            "failed to load image https://a.com/x.png: HTTP 404 Not Found"
        );
        assert_eq!(err.url(), Some("https://a.com/x.png"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_invalid_input_not_retryable() {
        let err = PreloadError::invalid_input("empty url");
        assert!(err.url().is_none());
        assert!(!err.is_retryable());
    }
}
