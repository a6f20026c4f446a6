//! UMH CLI Library
//!
//! Command-line interface for the uMod plugin harvester.
//!
//! # Overview
//!
//! - **Harvesting**: page through the catalog and persist one JSON file
//!   per plugin (`umh harvest`)
//! - **Inspection**: fetch live latest-release detail for one plugin
//!   (`umh inspect`)
//! - **Organization**: re-partition harvested plugin directories into
//!   category buckets (`umh organize`)
//! - **Status**: summarize the output directory (`umh status`)

pub mod commands;
pub mod logging;
pub mod organize;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use umh_core::config::{
    DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_MAX_PAGES, DEFAULT_OUTPUT_DIR, DEFAULT_PER_PAGE,
    DEFAULT_WORKER_COUNT,
};

/// UMH - uMod Plugin Harvester
#[derive(Parser, Debug)]
#[command(name = "umh")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Catalog root URL
    #[arg(long, env = "UMH_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Harvest plugin metadata from the catalog
    Harvest {
        /// Directory that receives one JSON file per plugin
        #[arg(short, long, env = "UMH_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// Concurrent normalize-and-save workers per batch
        #[arg(long, env = "UMH_WORKERS", default_value_t = DEFAULT_WORKER_COUNT)]
        workers: usize,

        /// Maximum catalog pages to fetch
        #[arg(long, env = "UMH_MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: u32,

        /// Records requested per catalog page
        #[arg(long, env = "UMH_PER_PAGE", default_value_t = DEFAULT_PER_PAGE)]
        per_page: u32,

        /// Records per batch; a pacing pause separates batches
        #[arg(long, env = "UMH_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Disable the polite pacing delays (stub servers and local runs)
        #[arg(long)]
        fast: bool,
    },

    /// Fetch live latest-release detail for one plugin
    Inspect {
        /// Plugin slug (e.g. "gather-manager")
        slug: String,

        /// Print the raw detail as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-partition harvested plugin directories into category buckets
    Organize {
        /// Directory holding one subdirectory per plugin
        #[arg(short, long, default_value = "plugins")]
        source_dir: PathBuf,

        /// Destination directory for the category buckets
        #[arg(short, long, default_value = "categorized_plugins")]
        output_dir: PathBuf,

        /// Bucket naming rule
        #[arg(long, value_enum, default_value = "alpha")]
        rule: organize::Rule,

        /// Upper bound on plugins per category bucket
        #[arg(long, default_value_t = 250)]
        max_per_category: usize,
    },

    /// Summarize the harvested output directory
    Status {
        /// Directory to summarize
        #[arg(short, long, env = "UMH_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
    },
}
