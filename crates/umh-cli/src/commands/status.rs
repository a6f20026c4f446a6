//! `umh status` command implementation
//!
//! Summarizes the harvested output directory.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use umh_core::harvest::DirSnapshot;

/// Show output-directory statistics
pub async fn run(output_dir: PathBuf) -> Result<()> {
    let snapshot = DirSnapshot::scan(&output_dir);

    if snapshot.file_count == 0 {
        println!("No plugins found in {}", output_dir.display());
        println!("Run 'umh harvest' to populate it.");
        return Ok(());
    }

    println!("{}", "Harvested plugins:".cyan().bold());
    println!("  Directory:  {}", output_dir.display());
    println!("  Files:      {}", snapshot.file_count);
    println!("  Total size: {}", format_bytes(snapshot.total_bytes));
    if !snapshot.recent.is_empty() {
        println!("  Most recent:");
        for name in &snapshot.recent {
            println!("    {}", name.green());
        }
    }

    Ok(())
}

/// Format a byte count in human-readable units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}
