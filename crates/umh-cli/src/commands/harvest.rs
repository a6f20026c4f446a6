//! `umh harvest` command implementation
//!
//! Runs the full harvesting pipeline with Ctrl-C wired to graceful
//! shutdown: stop accepting new pages and chunks, let in-flight work drain.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use umh_core::{HarvestConfig, Harvester};

/// Effect-bearing knobs taken from flags and `UMH_*` variables.
pub struct HarvestArgs {
    pub base_url: String,
    pub output_dir: PathBuf,
    pub workers: usize,
    pub max_pages: u32,
    pub per_page: u32,
    pub batch_size: usize,
    pub fast: bool,
}

/// Run one harvest
pub async fn run(args: HarvestArgs) -> Result<()> {
    let mut config = if args.fast {
        HarvestConfig::fast()
    } else {
        HarvestConfig::new()
    };
    config.set_base_url(args.base_url);
    config.output_dir = args.output_dir;
    config.worker_count = args.workers.max(1);
    config.max_pages = args.max_pages.max(1);
    config.per_page = args.per_page.max(1);
    config.batch_size = args.batch_size.max(1);

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, letting in-flight work drain");
            signal_token.cancel();
        }
    });

    println!("{} Harvesting plugin catalog...", "→".cyan());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("fetching and processing records");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let harvester = Harvester::new(config)?;
    let summary = harvester.run(&cancel).await;

    spinner.finish_and_clear();

    println!("{} Harvest complete", "✓".green());
    println!("  Pages fetched:   {}", summary.pages_fetched);
    println!("  Records fetched: {}", summary.records_fetched);
    println!("  Saved:           {}", summary.saved.to_string().green());
    println!("  Skipped:         {}", summary.skipped);
    if summary.failed > 0 {
        println!("  Failed:          {}", summary.failed.to_string().red());
    }
    if summary.aborted {
        println!(
            "{} Pagination stopped early after repeated fetch failures; partial results kept",
            "!".yellow()
        );
    }

    let snapshot = harvester.snapshot();
    println!(
        "  Output now holds {} file(s), {} bytes",
        snapshot.file_count, snapshot.total_bytes
    );

    Ok(())
}
