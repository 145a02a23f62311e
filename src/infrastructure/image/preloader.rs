//! Bounded-concurrency image preload queue.
//!
//! Loads are coalesced per URL, cached once they succeed, and forgotten when
//! they fail. Batches run in fixed windows: a window must fully settle before
//! the next one starts.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{self, BoxFuture, Shared};
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::domain::entities::{FetchPriority, LoadState, LoadedImage, PreloadStats};
use crate::domain::errors::PreloadError;
use crate::domain::ports::ImageFetchPort;

/// Outcome of a single preload.
pub type PreloadResult = Result<LoadedImage, PreloadError>;

/// Pending preload shared by every caller that asked for the same URL.
pub type PreloadFuture = Shared<BoxFuture<'static, PreloadResult>>;

/// Called with `(settled, total)` after each item of a batch settles.
pub type ProgressCallback = Box<dyn FnMut(usize, usize) + Send>;

/// Called with the failing URL and its error.
pub type ErrorCallback = Box<dyn FnMut(&str, &PreloadError) + Send>;

/// Tier sizes and timing for the critical/lazy helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadConfig {
    /// How many leading images count as critical.
    #[serde(default = "default_critical_count")]
    pub critical_count: usize,

    /// Window size for the critical tier.
    #[serde(default = "default_critical_max_concurrent")]
    pub critical_max_concurrent: usize,

    /// Window size for the lazy tier.
    #[serde(default = "default_lazy_max_concurrent")]
    pub lazy_max_concurrent: usize,

    /// Delay before the lazy tier starts, in milliseconds.
    #[serde(default = "default_lazy_delay_ms")]
    pub lazy_delay_ms: u64,
}

const fn default_critical_count() -> usize {
    3
}

const fn default_critical_max_concurrent() -> usize {
    3
}

const fn default_lazy_max_concurrent() -> usize {
    2
}

const fn default_lazy_delay_ms() -> u64 {
    1000
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            critical_count: default_critical_count(),
            critical_max_concurrent: default_critical_max_concurrent(),
            lazy_max_concurrent: default_lazy_max_concurrent(),
            lazy_delay_ms: default_lazy_delay_ms(),
        }
    }
}

impl PreloadConfig {
    /// Returns the lazy tier delay.
    #[must_use]
    pub const fn lazy_delay(&self) -> Duration {
        Duration::from_millis(self.lazy_delay_ms)
    }
}

/// Options for [`ImagePreloader::preload_batch`].
pub struct BatchOptions {
    /// Fetch every item with the eager hint.
    pub priority: bool,
    /// Window size. Zero is treated as one.
    pub max_concurrent: usize,
    on_progress: Option<ProgressCallback>,
    on_error: Option<ErrorCallback>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            priority: false,
            max_concurrent: 3,
            on_progress: None,
            on_error: None,
        }
    }
}

impl std::fmt::Debug for BatchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchOptions")
            .field("priority", &self.priority)
            .field("max_concurrent", &self.max_concurrent)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl BatchOptions {
    /// Creates options with the defaults (lazy hint, window of 3).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the priority flag.
    #[must_use]
    pub const fn priority(mut self, priority: bool) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the window size.
    #[must_use]
    pub const fn max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Registers a progress callback.
    #[must_use]
    pub fn on_progress(mut self, callback: impl FnMut(usize, usize) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Registers a per-item error callback.
    #[must_use]
    pub fn on_error(mut self, callback: impl FnMut(&str, &PreloadError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }
}

/// Handle to a deferred lazy-tier batch.
#[derive(Debug)]
pub struct LazyPreload {
    handle: Option<JoinHandle<Vec<LoadedImage>>>,
    scheduled: usize,
}

impl LazyPreload {
    /// Number of URLs handed to the lazy tier.
    #[must_use]
    pub const fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Returns true once the batch has finished or was cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stops the batch. Windows not yet started never start; loads already
    /// running settle on their own.
    pub fn cancel(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    /// Waits for the batch and returns what loaded.
    /// A cancelled batch yields an empty list.
    pub async fn join(self) -> Vec<LoadedImage> {
        let Some(handle) = self.handle else {
            return Vec::new();
        };
        match handle.await {
            Ok(images) => images,
            Err(e) if e.is_cancelled() => {
                debug!(scheduled = self.scheduled, "Lazy preload cancelled");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Lazy preload task failed");
                Vec::new()
            }
        }
    }
}

#[derive(Default)]
struct PreloadState {
    loaded: HashMap<String, LoadedImage>,
    in_flight: HashMap<String, PreloadFuture>,
    /// Bumped by `clear_cache`; loads started earlier must not write back.
    generation: u64,
}

struct Inner {
    fetcher: Arc<dyn ImageFetchPort>,
    state: Mutex<PreloadState>,
    config: PreloadConfig,
}

/// Deduplicating, windowed image preloader.
///
/// Cloning is cheap and every clone shares the same cache.
#[derive(Clone)]
pub struct ImagePreloader {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ImagePreloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePreloader")
            .field("config", &self.inner.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl ImagePreloader {
    /// Creates a preloader with default tier settings.
    #[must_use]
    pub fn new(fetcher: Arc<dyn ImageFetchPort>) -> Self {
        Self::with_config(fetcher, PreloadConfig::default())
    }

    /// Creates a preloader with explicit tier settings.
    #[must_use]
    pub fn with_config(fetcher: Arc<dyn ImageFetchPort>, config: PreloadConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                state: Mutex::new(PreloadState::default()),
                config,
            }),
        }
    }

    /// Returns the tier settings.
    #[must_use]
    pub fn config(&self) -> &PreloadConfig {
        &self.inner.config
    }

    /// Starts loading `url`, or joins the load already running for it.
    ///
    /// The load runs on its own tokio task, so it settles even if the
    /// returned future is dropped. Outside a runtime the future fails.
    #[must_use]
    pub fn preload_one(&self, url: &str, priority: FetchPriority) -> PreloadFuture {
        if url.trim().is_empty() {
            return future::ready(Err(PreloadError::invalid_input("image url is empty")))
                .boxed()
                .shared();
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return future::ready(Err(PreloadError::load_failed(
                url,
                "no async runtime to run the load on",
            )))
            .boxed()
            .shared();
        };

        let mut state = self.inner.state.lock();

        if let Some(image) = state.loaded.get(url) {
            trace!(url = %url, "Preload cache hit");
            return future::ready(Ok(image.clone())).boxed().shared();
        }

        if let Some(pending) = state.in_flight.get(url) {
            trace!(url = %url, "Joining in-flight preload");
            return pending.clone();
        }

        let guard = SettleGuard {
            inner: self.inner.clone(),
            url: url.to_owned(),
            generation: state.generation,
        };
        let task = runtime.spawn(guard.run(priority));

        let task_url = url.to_owned();
        let pending = async move {
            task.await.unwrap_or_else(|e| {
                Err(PreloadError::load_failed(
                    task_url,
                    format!("load task failed: {e}"),
                ))
            })
        }
        .boxed()
        .shared();

        state.in_flight.insert(url.to_owned(), pending.clone());
        pending
    }

    /// Loads `urls` in windows of `options.max_concurrent`.
    ///
    /// URLs already loaded are skipped. Failures go to `on_error` and never
    /// fail the batch; the result holds the successes in settlement order.
    pub fn preload_batch<I, S>(
        &self,
        urls: I,
        options: BatchOptions,
    ) -> impl Future<Output = Vec<LoadedImage>> + Send + use<I, S>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let urls: Vec<String> = urls.into_iter().map(Into::into).collect();
        self.clone().run_batch(urls, options)
    }

    async fn run_batch(self, urls: Vec<String>, mut options: BatchOptions) -> Vec<LoadedImage> {
        let pending: Vec<String> = {
            let state = self.inner.state.lock();
            urls.into_iter()
                .filter(|url| !state.loaded.contains_key(url))
                .collect()
        };

        let total = pending.len();
        if total == 0 {
            return Vec::new();
        }

        let priority = FetchPriority::from_flag(options.priority);
        let window = options.max_concurrent.max(1);
        debug!(total, window, %priority, "Starting preload batch");

        let mut loaded = Vec::with_capacity(total);
        let mut settled = 0usize;

        for chunk in pending.chunks(window) {
            let mut running: FuturesUnordered<_> = chunk
                .iter()
                .map(|url| {
                    let load = self.preload_one(url, priority);
                    let url = url.clone();
                    async move { (url, load.await) }
                })
                .collect();

            while let Some((url, result)) = running.next().await {
                settled += 1;
                match result {
                    Ok(image) => loaded.push(image),
                    Err(e) => {
                        if let Some(on_error) = options.on_error.as_mut() {
                            on_error(&url, &e);
                        }
                    }
                }
                if let Some(on_progress) = options.on_progress.as_mut() {
                    on_progress(settled, total);
                }
            }
        }

        debug!(
            total,
            loaded = loaded.len(),
            failed = total - loaded.len(),
            "Preload batch finished"
        );
        loaded
    }

    /// Loads the leading above-the-fold images eagerly.
    pub async fn preload_critical<S: AsRef<str>>(&self, urls: &[S]) -> Vec<LoadedImage> {
        let config = &self.inner.config;
        let critical: Vec<String> = urls
            .iter()
            .take(config.critical_count)
            .map(|url| url.as_ref().to_owned())
            .collect();

        let options = BatchOptions::new()
            .priority(true)
            .max_concurrent(config.critical_max_concurrent);

        self.preload_batch(critical, options).await
    }

    /// Schedules everything past the critical tier after the configured delay.
    #[must_use]
    pub fn preload_lazy<S: AsRef<str>>(&self, urls: &[S]) -> LazyPreload {
        self.preload_lazy_after(urls, self.inner.config.lazy_delay())
    }

    /// Schedules everything past the critical tier after `delay`.
    /// Returns immediately. Outside a runtime nothing is scheduled.
    #[must_use]
    pub fn preload_lazy_after<S: AsRef<str>>(&self, urls: &[S], delay: Duration) -> LazyPreload {
        let config = &self.inner.config;
        let deferred: Vec<String> = urls
            .iter()
            .skip(config.critical_count)
            .map(|url| url.as_ref().to_owned())
            .collect();
        let scheduled = deferred.len();

        let options = BatchOptions::new()
            .priority(false)
            .max_concurrent(config.lazy_max_concurrent);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(scheduled, "No async runtime, lazy preload skipped");
            return LazyPreload {
                handle: None,
                scheduled,
            };
        };

        let preloader = self.clone();
        let handle = runtime.spawn(async move {
            if deferred.is_empty() {
                return Vec::new();
            }
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            preloader.preload_batch(deferred, options).await
        });

        debug!(scheduled, delay = ?delay, "Lazy preload scheduled");
        LazyPreload {
            handle: Some(handle),
            scheduled,
        }
    }

    /// Forgets every loaded and in-flight URL.
    ///
    /// Futures already handed out still resolve; loads that were running
    /// do not repopulate the cache.
    pub fn clear_cache(&self) {
        let mut state = self.inner.state.lock();
        let loaded = state.loaded.len();
        let in_flight = state.in_flight.len();
        state.loaded.clear();
        state.in_flight.clear();
        state.generation = state.generation.wrapping_add(1);
        info!(loaded, in_flight, "Cleared image preload cache");
    }

    /// Returns a snapshot of cache counters.
    #[must_use]
    pub fn stats(&self) -> PreloadStats {
        let state = self.inner.state.lock();
        PreloadStats {
            loaded_count: state.loaded.len(),
            in_flight_count: state.in_flight.len(),
        }
    }

    /// Returns where `url` sits in the pipeline.
    #[must_use]
    pub fn load_state(&self, url: &str) -> LoadState {
        let state = self.inner.state.lock();
        if state.loaded.contains_key(url) {
            LoadState::Loaded
        } else if state.in_flight.contains_key(url) {
            LoadState::InFlight
        } else {
            LoadState::Unrequested
        }
    }
}

/// Owns one load. Clears the in-flight entry when dropped, including on
/// panic or runtime shutdown.
struct SettleGuard {
    inner: Arc<Inner>,
    url: String,
    generation: u64,
}

impl SettleGuard {
    async fn run(self, priority: FetchPriority) -> PreloadResult {
        debug!(url = %self.url, %priority, "Loading image");

        let result = self.inner.fetcher.fetch(&self.url, priority).await;

        match &result {
            Ok(image) => {
                let mut state = self.inner.state.lock();
                if state.generation == self.generation {
                    state.loaded.insert(self.url.clone(), image.clone());
                }
                drop(state);
                debug!(
                    url = %self.url,
                    width = image.width(),
                    height = image.height(),
                    "Image loaded"
                );
            }
            Err(e) => warn!(url = %self.url, error = %e, "Image load failed"),
        }

        result
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        let mut state = self.inner.state.lock();
        if state.generation == self.generation {
            state.in_flight.remove(&self.url);
        }
    }
}
