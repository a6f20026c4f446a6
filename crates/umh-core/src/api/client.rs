//! HTTP client for the uMod catalog
//!
//! One `reqwest::Client` is built at construction with browser-like default
//! headers and a request timeout; there is no ambient global client. Every
//! logical call acquires a permit from the rate gate before touching the
//! network and holds it across all of its retries, so at most
//! `max_inflight_requests` catalog calls are outstanding at any instant
//! regardless of how many workers issue them.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, REFERER};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::api::endpoints;
use crate::api::types::{PluginDetail, SearchPage};
use crate::config::HarvestConfig;
use crate::error::{HarvestError, Result};
use crate::retry::{PauseRange, RetryPolicy};

/// User agent presented to the catalog.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Rate-limited catalog client.
///
/// Retry policy: rate-limit responses (HTTP 429) and transient failures
/// share one attempt budget per logical call; both paths terminate in
/// [`HarvestError::RetriesExhausted`] once the budget is spent.
#[derive(Clone)]
pub struct UmodClient {
    client: Client,
    base_url: String,
    gate: Arc<Semaphore>,
    policy: RetryPolicy,
    pre_request_jitter: PauseRange,
    post_success_pause: PauseRange,
}

impl UmodClient {
    /// Create a client from the pipeline configuration
    pub fn new(config: &HarvestConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        if let Ok(referer) = HeaderValue::from_str(&format!("{}/plugins", config.base_url)) {
            headers.insert(REFERER, referer);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            gate: Arc::new(Semaphore::new(config.max_inflight_requests.max(1))),
            policy: RetryPolicy::new(
                config.max_attempts,
                config.base_backoff,
                config.retry_jitter,
            ),
            pre_request_jitter: config.pre_request_jitter,
            post_success_pause: config.post_success_pause,
        })
    }

    /// Get the catalog root URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of the plugin search endpoint
    pub async fn search_page(&self, page: u32, per_page: u32) -> Result<SearchPage> {
        let url = endpoints::search_url(&self.base_url);
        let params = endpoints::search_params(page, per_page);
        let body = self.get_json(&url, &params).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Fetch the latest-release detail for one plugin
    pub async fn plugin_latest(&self, slug: &str) -> Result<PluginDetail> {
        let url = endpoints::plugin_latest_url(&self.base_url, slug);
        let body = self.get_json(&url, &[]).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Execute one logical GET-and-parse call under the rate gate.
    ///
    /// Sleeps a random jitter before the request, retries on failure with
    /// exponential backoff, and pauses briefly after a success so the
    /// steady-state request rate stays polite even without contention.
    async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Value> {
        tokio::time::sleep(self.pre_request_jitter.sample()).await;

        // The gate is never closed, so acquire cannot fail.
        let _permit = self
            .gate
            .acquire()
            .await
            .expect("request gate semaphore closed");

        for attempt in 1..=self.policy.max_attempts {
            debug!(url, attempt, "issuing catalog request");
            match self.try_get(url, query).await {
                Ok(body) => {
                    tokio::time::sleep(self.post_success_pause.sample()).await;
                    return Ok(body);
                }
                Err(err) => {
                    let rate_limited = matches!(
                        &err,
                        HarvestError::Status { status, .. }
                            if *status == StatusCode::TOO_MANY_REQUESTS
                    );
                    if !self.policy.should_retry(attempt) {
                        warn!(url, attempt, error = %err, "final attempt failed");
                        break;
                    }
                    let wait = self.policy.backoff_delay_jittered(attempt);
                    if rate_limited {
                        warn!(
                            url,
                            attempt,
                            wait_ms = wait.as_millis() as u64,
                            "rate limit hit, backing off before retry"
                        );
                    } else {
                        warn!(
                            url,
                            attempt,
                            wait_ms = wait.as_millis() as u64,
                            error = %err,
                            "request failed, retrying"
                        );
                    }
                    tokio::time::sleep(wait).await;
                }
            }
        }

        Err(HarvestError::retries_exhausted(url, self.policy.max_attempts))
    }

    /// One request attempt: send, check status, parse JSON.
    async fn try_get(&self, url: &str, query: &[(String, String)]) -> Result<Value> {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::status(url, status));
        }
        Ok(response.json().await?)
    }
}
