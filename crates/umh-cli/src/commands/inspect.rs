//! `umh inspect` command implementation
//!
//! Fetches live latest-release detail for one plugin from the per-plugin
//! endpoint. A single one-shot request, so the polite pacing delays used by
//! harvest runs are skipped.

use anyhow::Result;
use colored::Colorize;

use umh_core::api::{endpoints, UmodClient};
use umh_core::HarvestConfig;

/// Fetch and print one plugin's latest-release detail
pub async fn run(base_url: String, slug: String, json: bool) -> Result<()> {
    let mut config = HarvestConfig::fast();
    config.set_base_url(base_url);

    let client = UmodClient::new(&config)?;
    let detail = client.plugin_latest(&slug).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let version = detail.version.as_deref().unwrap_or("unknown");
    println!("{}", slug.cyan().bold());
    println!("  Version:  {}", version);
    println!(
        "  Released: {}",
        detail.created_at.as_deref().unwrap_or("-")
    );
    println!(
        "  Download: {}",
        endpoints::download_url(client.base_url(), &slug, version)
    );
    match detail.changelog.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(changelog) => {
            println!("  Changelog:");
            for line in changelog.lines() {
                println!("    {}", line);
            }
        }
        None => println!("  Changelog: (none)"),
    }

    Ok(())
}
