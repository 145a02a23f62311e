//! HTTP adapter for the image fetch port.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::domain::entities::{FetchPriority, LoadedImage};
use crate::domain::errors::PreloadError;
use crate::domain::ports::ImageFetchPort;

/// Configuration for the HTTP image fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpFetcherConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("{}/{}", crate::NAME, crate::VERSION)
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Downloads images over HTTP and decodes them to confirm they are usable.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Creates a fetcher with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &HttpFetcherConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    /// Downloads image bytes from a URL.
    async fn download(&self, url: &str) -> Result<Bytes, PreloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PreloadError::load_failed(url, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PreloadError::load_failed(
                url,
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        response
            .bytes()
            .await
            .map_err(|e| PreloadError::load_failed(url, format!("failed to read body: {e}")))
    }
}

/// Decodes `bytes` and returns the image dimensions.
fn decode_dimensions(bytes: &[u8]) -> Result<(u32, u32), image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    Ok((img.width(), img.height()))
}

#[async_trait]
impl ImageFetchPort for HttpImageFetcher {
    async fn fetch(&self, url: &str, priority: FetchPriority) -> Result<LoadedImage, PreloadError> {
        // reqwest has no fetch-priority knob; the hint only travels with the handle.
        trace!(url = %url, %priority, "Fetching image over HTTP");

        let bytes = self.download(url).await?;
        let byte_len = bytes.len();

        let (width, height) = tokio::task::spawn_blocking(move || decode_dimensions(&bytes))
            .await
            .map_err(|e| PreloadError::load_failed(url, format!("decode task panicked: {e}")))?
            .map_err(|e| PreloadError::load_failed(url, format!("failed to decode image: {e}")))?;

        debug!(url = %url, width, height, byte_len, "Image fetched");

        Ok(LoadedImage::new(url, width, height, byte_len).with_priority(priority))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_fetcher_creation() {
        let fetcher = HttpImageFetcher::new(&HttpFetcherConfig::default());
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_default_user_agent() {
        let config = HttpFetcherConfig::default();
        assert!(config.user_agent.starts_with("lounge/"));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_decode_dimensions_png() -> Result<(), Box<dyn std::error::Error>> {
        let img = image::DynamicImage::new_rgb8(3, 2);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png)?;

        assert_eq!(decode_dimensions(buf.get_ref())?, (3, 2));
        Ok(())
    }

    #[test]
    fn test_decode_dimensions_rejects_garbage() {
        assert!(decode_dimensions(b"definitely not an image").is_err());
    }

    #[tokio::test]
    async fn test_invalid_url_is_load_failure() -> Result<(), Box<dyn std::error::Error>> {
        let fetcher = HttpImageFetcher::new(&HttpFetcherConfig::default())?;

        let err = fetcher
            .fetch("not a url", FetchPriority::Eager)
            .await
            .unwrap_err();

        assert!(matches!(err, PreloadError::LoadFailed { .. }));
        assert_eq!(err.url(), Some("not a url"));
        Ok(())
    }
}
