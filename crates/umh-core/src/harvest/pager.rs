//! Page fetcher
//!
//! Drives the search endpoint sequentially, page by page. Pagination is
//! inherently ordered: each response's `last_page` recomputes the ceiling
//! for the next iteration, clamped to the configured maximum. A page fetch
//! that exhausts its retries aborts the loop but keeps everything already
//! accumulated.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::UmodClient;
use crate::config::HarvestConfig;
use crate::model::RawRecord;

/// What pagination produced, whether it ran to completion or not.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Raw records accumulated across pages, in page order
    pub records: Vec<RawRecord>,
    /// Pages successfully fetched
    pub pages_fetched: u32,
    /// True when pagination stopped on an unrecoverable fetch error rather
    /// than reaching the ceiling or an empty page
    pub aborted: bool,
}

/// Sequential catalog pager.
pub struct PageFetcher<'a> {
    client: &'a UmodClient,
    config: &'a HarvestConfig,
}

impl<'a> PageFetcher<'a> {
    pub fn new(client: &'a UmodClient, config: &'a HarvestConfig) -> Self {
        Self { client, config }
    }

    /// Fetch pages until the ceiling, an empty page, an unrecoverable
    /// error, or cancellation. Never returns an error; partial progress is
    /// always preserved in the outcome.
    pub async fn fetch_all(&self, cancel: &CancellationToken) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();
        let mut page = 1u32;
        let mut total_pages = self.config.max_pages;

        while page <= total_pages {
            info!(page, total_pages, "fetching catalog page");

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!(page, "pagination cancelled");
                    break;
                }
                result = self.client.search_page(page, self.config.per_page) => result,
            };

            match result {
                Ok(body) => {
                    if body.data.is_empty() {
                        info!(page, "no records returned, pagination done");
                        break;
                    }

                    info!(page, records = body.data.len(), "received catalog page");
                    outcome.records.extend(body.data);
                    outcome.pages_fetched += 1;

                    total_pages = body.last_page.min(self.config.max_pages);
                    if page >= total_pages {
                        break;
                    }
                    page += 1;

                    tokio::select! {
                        _ = cancel.cancelled() => {
                            info!("pagination cancelled during page pause");
                            break;
                        }
                        _ = tokio::time::sleep(self.config.page_pause.sample()) => {}
                    }
                }
                Err(err) => {
                    warn!(
                        page,
                        error = %err,
                        "abandoning pagination after unrecoverable fetch error"
                    );
                    outcome.aborted = true;
                    break;
                }
            }
        }

        info!(
            records = outcome.records.len(),
            pages = outcome.pages_fetched,
            aborted = outcome.aborted,
            "pagination finished"
        );
        outcome
    }
}
