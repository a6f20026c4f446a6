//! Harvesting pipeline
//!
//! Ties the catalog client, page fetcher, batch processor, and persistence
//! sink into one run: fetch raw records page by page, then normalize and
//! persist them in barrier-delimited batches.

pub mod batch;
pub mod normalize;
pub mod pager;
pub mod progress;
pub mod sink;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::UmodClient;
use crate::config::HarvestConfig;
use crate::error::Result;

pub use batch::{BatchProcessor, BatchReport};
pub use normalize::{Outcome, SkipReason};
pub use pager::{FetchOutcome, PageFetcher};
pub use progress::DirSnapshot;
pub use sink::PluginStore;

/// What one harvest run accomplished.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Catalog pages successfully fetched
    pub pages_fetched: u32,
    /// Raw records accumulated across those pages
    pub records_fetched: usize,
    /// Entities persisted and verified
    pub saved: usize,
    /// Records discarded by the normalizer
    pub skipped: usize,
    /// Records whose persistence failed
    pub failed: usize,
    /// True when pagination stopped early on repeated fetch failures;
    /// the records accumulated up to that point were still processed
    pub aborted: bool,
}

/// End-to-end pipeline facade.
pub struct Harvester {
    client: UmodClient,
    store: Arc<PluginStore>,
    config: HarvestConfig,
}

impl Harvester {
    /// Build the pipeline: HTTP client plus output store
    pub fn new(config: HarvestConfig) -> Result<Self> {
        let client = UmodClient::new(&config)?;
        let store = Arc::new(PluginStore::new(&config.output_dir)?);
        Ok(Self {
            client,
            store,
            config,
        })
    }

    /// Run one harvest: fetch all pages, then process all records.
    ///
    /// Pagination abort is reported in the summary, not as an error; the
    /// run continues with whatever was accumulated.
    pub async fn run(&self, cancel: &CancellationToken) -> HarvestSummary {
        info!(
            base_url = %self.config.base_url,
            output_dir = %self.config.output_dir.display(),
            max_pages = self.config.max_pages,
            "starting harvest"
        );

        let fetch = PageFetcher::new(&self.client, &self.config)
            .fetch_all(cancel)
            .await;
        if fetch.aborted {
            warn!(
                records = fetch.records.len(),
                "pagination aborted, processing partial results"
            );
        }

        let records_fetched = fetch.records.len();
        let report = BatchProcessor::new(self.config.clone(), self.store.clone())
            .process_all(fetch.records, cancel)
            .await;

        let summary = HarvestSummary {
            pages_fetched: fetch.pages_fetched,
            records_fetched,
            saved: report.saved,
            skipped: report.skipped,
            failed: report.failed,
            aborted: fetch.aborted,
        };
        info!(
            pages = summary.pages_fetched,
            records = summary.records_fetched,
            saved = summary.saved,
            skipped = summary.skipped,
            failed = summary.failed,
            aborted = summary.aborted,
            "harvest finished"
        );
        summary
    }

    /// Advisory snapshot of the output directory
    pub fn snapshot(&self) -> DirSnapshot {
        DirSnapshot::scan(self.store.output_dir())
    }
}
