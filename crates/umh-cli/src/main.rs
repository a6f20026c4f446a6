//! UMH CLI - Main entry point

use clap::Parser;
use std::process;
use tracing::error;

use umh_cli::commands::harvest::HarvestArgs;
use umh_cli::logging::{init_logging, LogConfig, LogLevel};
use umh_cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Pick up UMH_* variables from a local .env, if any
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Verbose flag lowers the level; UMH_LOG_* variables take precedence.
    // An unparseable variable is a configuration error, not something to
    // paper over with defaults.
    let mut log_config = LogConfig::new();
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    let log_config = match LogConfig::from_env(log_config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    // The CLI still works if a subscriber was already installed
    let _ = init_logging(&log_config);

    if let Err(e) = execute_command(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Harvest {
            output_dir,
            workers,
            max_pages,
            per_page,
            batch_size,
            fast,
        } => {
            umh_cli::commands::harvest::run(HarvestArgs {
                base_url: cli.base_url,
                output_dir,
                workers,
                max_pages,
                per_page,
                batch_size,
                fast,
            })
            .await
        }

        Commands::Inspect { slug, json } => {
            umh_cli::commands::inspect::run(cli.base_url, slug, json).await
        }

        Commands::Organize {
            source_dir,
            output_dir,
            rule,
            max_per_category,
        } => umh_cli::commands::organize::run(source_dir, output_dir, rule, max_per_category).await,

        Commands::Status { output_dir } => umh_cli::commands::status::run(output_dir).await,
    }
}
