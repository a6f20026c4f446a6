//! `umh organize` command implementation
//!
//! Offline re-partitioning of harvested plugin directories into category
//! buckets. Runs entirely on the local file system; the harvest pipeline
//! is never involved.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::organize::{Organizer, Rule};

/// Re-partition plugin directories into category buckets
pub async fn run(
    source_dir: PathBuf,
    output_dir: PathBuf,
    rule: Rule,
    max_per_category: usize,
) -> Result<()> {
    let organizer = Organizer::new(source_dir, &output_dir, max_per_category);
    let summary = organizer.run(rule)?;

    if summary.is_empty() {
        println!("No plugin directories found to organize.");
        return Ok(());
    }

    println!("{}", "Plugin categories:".cyan().bold());
    for (bucket, count) in &summary {
        println!("  {}: {} plugin(s)", bucket.green(), count);
    }
    println!(
        "{} Created {} categories under {}",
        "✓".green(),
        summary.len(),
        output_dir.display()
    );

    Ok(())
}
