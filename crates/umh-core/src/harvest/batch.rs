//! Batch processor
//!
//! Partitions the accumulated raw records into fixed-size chunks and runs a
//! bounded worker pool over each chunk: normalize, then persist, inside the
//! same task so a save failure is attributable to its record. Every chunk
//! is fully drained before the next one starts; results are collected from
//! the drained task outputs rather than shared counters.

use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use chrono::Utc;

use crate::config::HarvestConfig;
use crate::harvest::normalize::{normalize, Outcome};
use crate::harvest::progress::DirSnapshot;
use crate::harvest::sink::PluginStore;
use crate::model::RawRecord;

/// Aggregate counters for one processing run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Records handed to workers
    pub processed: usize,
    /// Entities persisted and verified
    pub saved: usize,
    /// Records discarded by the normalizer
    pub skipped: usize,
    /// Records whose persistence failed, plus worker panics
    pub failed: usize,
    /// Chunks completed
    pub chunks: usize,
}

/// One worker's terminal outcome for one record.
enum WorkerResult {
    Saved,
    Skipped,
    Failed,
}

/// Chunked, pool-bounded record processor.
pub struct BatchProcessor {
    config: HarvestConfig,
    store: Arc<PluginStore>,
}

impl BatchProcessor {
    pub fn new(config: HarvestConfig, store: Arc<PluginStore>) -> Self {
        Self { config, store }
    }

    /// Process every record, chunk by chunk. A single record's failure
    /// never aborts its chunk or the chunks after it.
    pub async fn process_all(
        &self,
        records: Vec<RawRecord>,
        cancel: &CancellationToken,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        if records.is_empty() {
            info!("no records to process");
            return report;
        }

        let batch_size = self.config.batch_size.max(1);
        let total_chunks = records.len().div_ceil(batch_size);
        let chunks: Vec<Vec<RawRecord>> = records
            .chunks(batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();

        for (index, chunk) in chunks.into_iter().enumerate() {
            if cancel.is_cancelled() {
                info!(chunk = index + 1, total_chunks, "processing cancelled");
                break;
            }

            info!(
                chunk = index + 1,
                total_chunks,
                records = chunk.len(),
                "processing batch"
            );
            self.process_chunk(chunk, &mut report).await;
            report.chunks += 1;

            DirSnapshot::scan(self.store.output_dir()).log();

            if index + 1 < total_chunks {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("processing cancelled during batch pause");
                        break;
                    }
                    _ = tokio::time::sleep(self.config.batch_pause.sample()) => {}
                }
            }
        }

        info!(
            processed = report.processed,
            saved = report.saved,
            skipped = report.skipped,
            failed = report.failed,
            chunks = report.chunks,
            "batch processing finished"
        );
        report
    }

    /// Run one chunk on the worker pool and drain every task before
    /// returning; the drain is the barrier between consecutive chunks.
    async fn process_chunk(&self, chunk: Vec<RawRecord>, report: &mut BatchReport) {
        let pool = Arc::new(Semaphore::new(self.config.worker_count.max(1)));
        let mut tasks = FuturesUnordered::new();

        for raw in chunk {
            // Admission waits here once the pool is full, so at most
            // worker_count normalizations run at a time.
            let permit = pool
                .clone()
                .acquire_owned()
                .await
                .expect("worker pool semaphore closed");
            let store = self.store.clone();
            let base_url = self.config.base_url.clone();

            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                match normalize(&raw, &base_url, Utc::now()) {
                    Outcome::Normalized(plugin) => {
                        if store.save(&plugin) {
                            WorkerResult::Saved
                        } else {
                            WorkerResult::Failed
                        }
                    }
                    // Skip reason already logged at the decision site
                    Outcome::Skipped(_) => WorkerResult::Skipped,
                }
            }));
        }

        while let Some(joined) = tasks.next().await {
            report.processed += 1;
            match joined {
                Ok(WorkerResult::Saved) => report.saved += 1,
                Ok(WorkerResult::Skipped) => report.skipped += 1,
                Ok(WorkerResult::Failed) => report.failed += 1,
                Err(err) => {
                    error!(error = %err, "worker task panicked");
                    report.failed += 1;
                }
            }
        }
    }
}
