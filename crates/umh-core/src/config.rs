//! Configuration for the harvesting pipeline
//!
//! Every effect-bearing knob (concurrency widths, retry budget, pacing
//! ranges, page and batch sizes) lives here so behavior is reproducible
//! from a single value.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{HarvestError, Result};
use crate::retry::PauseRange;

// ============================================================================
// Harvest Configuration Constants
// ============================================================================

/// Default catalog root when not specified via environment variable.
pub const DEFAULT_BASE_URL: &str = "https://umod.org";

/// Default directory that receives one JSON file per plugin.
pub const DEFAULT_OUTPUT_DIR: &str = "plugins_data";

/// Default number of concurrent normalize-and-save workers per batch.
pub const DEFAULT_WORKER_COUNT: usize = 3;

/// Default pagination ceiling (pages fetched per run).
pub const DEFAULT_MAX_PAGES: u32 = 3;

/// Default records requested per catalog page.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Default number of records processed between batch barriers.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Default cap on simultaneous in-flight catalog requests.
pub const DEFAULT_MAX_INFLIGHT_REQUESTS: usize = 2;

/// Default attempt budget per logical request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay for exponential backoff.
pub const DEFAULT_BASE_BACKOFF: Duration = Duration::from_secs(10);

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pipeline configuration
///
/// The pacing fields mirror how a polite scraper spreads load: a random
/// pause before every request, a short pause after every success, and
/// longer pauses between pages and between batches.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Catalog root URL (scheme + host, no trailing slash)
    pub base_url: String,

    /// Directory that receives one `<id>.json` file per plugin
    pub output_dir: PathBuf,

    /// Concurrent normalize-and-save workers per batch
    pub worker_count: usize,

    /// Pagination ceiling; the effective ceiling is the smaller of this and
    /// the `last_page` the server reports
    pub max_pages: u32,

    /// Records requested per catalog page
    pub per_page: u32,

    /// Records per batch; a barrier separates consecutive batches
    pub batch_size: usize,

    /// Cap on simultaneous in-flight catalog requests (the rate gate width)
    pub max_inflight_requests: usize,

    /// Attempt budget per logical request
    pub max_attempts: u32,

    /// Base delay for exponential backoff between attempts
    pub base_backoff: Duration,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Random pause before every request
    pub pre_request_jitter: PauseRange,

    /// Random extra delay added to each backoff wait
    pub retry_jitter: PauseRange,

    /// Pause after every successful request
    pub post_success_pause: PauseRange,

    /// Pause between consecutive page fetches
    pub page_pause: PauseRange,

    /// Pause between consecutive batches
    pub batch_pause: PauseRange,
}

impl HarvestConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            worker_count: DEFAULT_WORKER_COUNT,
            max_pages: DEFAULT_MAX_PAGES,
            per_page: DEFAULT_PER_PAGE,
            batch_size: DEFAULT_BATCH_SIZE,
            max_inflight_requests: DEFAULT_MAX_INFLIGHT_REQUESTS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: DEFAULT_BASE_BACKOFF,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            pre_request_jitter: PauseRange::from_millis(1_500, 4_000),
            retry_jitter: PauseRange::from_millis(1_000, 5_000),
            post_success_pause: PauseRange::from_millis(3_000, 5_000),
            page_pause: PauseRange::from_millis(6_000, 8_000),
            batch_pause: PauseRange::from_millis(11_000, 15_000),
        }
    }

    /// Load config from `UMH_*` environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new();

        if let Ok(url) = std::env::var("UMH_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(dir) = std::env::var("UMH_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        if let Some(workers) = parse_env::<usize>("UMH_WORKERS")? {
            config.worker_count = workers.max(1);
        }

        if let Some(pages) = parse_env::<u32>("UMH_MAX_PAGES")? {
            config.max_pages = pages.max(1);
        }

        if let Some(per_page) = parse_env::<u32>("UMH_PER_PAGE")? {
            config.per_page = per_page.max(1);
        }

        if let Some(batch) = parse_env::<usize>("UMH_BATCH_SIZE")? {
            config.batch_size = batch.max(1);
        }

        Ok(config)
    }

    /// Preset with pacing disabled and a short backoff, for tests and
    /// stub-server runs
    pub fn fast() -> Self {
        Self {
            base_backoff: Duration::from_millis(10),
            request_timeout: Duration::from_secs(5),
            pre_request_jitter: PauseRange::ZERO,
            retry_jitter: PauseRange::ZERO,
            post_success_pause: PauseRange::ZERO,
            page_pause: PauseRange::ZERO,
            batch_pause: PauseRange::ZERO,
            ..Self::new()
        }
    }

    /// Set the catalog root, stripping any trailing slash
    pub fn set_base_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| HarvestError::config(format!("{key} must be a positive number, got '{raw}'"))),
        Err(_) => Ok(None),
    }
}
