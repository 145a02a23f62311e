//! Domain types for image preloading.

use std::sync::Arc;

/// Eagerness hint handed to the platform when fetching an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FetchPriority {
    /// Fetch right away, ahead of other network work.
    Eager,
    /// Fetch when the platform has capacity.
    #[default]
    Lazy,
}

impl FetchPriority {
    /// Maps the boolean `priority` flag used by batch options.
    #[must_use]
    pub const fn from_flag(priority: bool) -> Self {
        if priority { Self::Eager } else { Self::Lazy }
    }

    /// Returns true for the eager hint.
    #[must_use]
    pub const fn is_eager(self) -> bool {
        matches!(self, Self::Eager)
    }
}

impl std::fmt::Display for FetchPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eager => write!(f, "eager"),
            Self::Lazy => write!(f, "lazy"),
        }
    }
}

/// Where a URL currently sits in the preload pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Never requested, or the last attempt failed.
    #[default]
    Unrequested,
    /// A load has started and has not settled yet.
    InFlight,
    /// Loaded successfully; served from cache from now on.
    Loaded,
}

impl LoadState {
    /// Returns true if the image is ready.
    #[must_use]
    pub const fn is_loaded(self) -> bool {
        matches!(self, Self::Loaded)
    }

    /// Returns true if a load is pending.
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::InFlight)
    }
}

/// Handle to an image that finished loading.
/// Cheap to clone; the URL is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    url: Arc<str>,
    width: u32,
    height: u32,
    byte_len: usize,
    priority: FetchPriority,
}

impl LoadedImage {
    /// Creates a new handle.
    #[must_use]
    pub fn new(url: impl Into<Arc<str>>, width: u32, height: u32, byte_len: usize) -> Self {
        Self {
            url: url.into(),
            width,
            height,
            byte_len,
            priority: FetchPriority::default(),
        }
    }

    /// Records the priority hint the image was fetched with.
    #[must_use]
    pub const fn with_priority(mut self, priority: FetchPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the source URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the decoded width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the decoded height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the size of the downloaded payload.
    #[must_use]
    pub const fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Returns the priority hint used for the fetch.
    #[must_use]
    pub const fn priority(&self) -> FetchPriority {
        self.priority
    }
}

/// Point-in-time snapshot of preloader state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreloadStats {
    /// Number of URLs loaded and cached.
    pub loaded_count: usize,
    /// Number of loads currently pending.
    pub in_flight_count: usize,
}

impl std::fmt::Display for PreloadStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Preload: {} loaded, {} in flight",
            self.loaded_count, self.in_flight_count
        )
    }
}
