//! Linkhound main entry point
//!
//! This is the command-line interface for the Linkhound link auditor.

use anyhow::Context;
use clap::{Parser, Subcommand};
use linkhound::config::{load_config, Config};
use linkhound::crawler::{print_drive_statistics, run_drive, run_tracker, run_wiki};
use linkhound::output::print_statistics;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Linkhound: finds hosted-document links in wikis and issue trackers
///
/// Linkhound crawls a wiki site or an issue tracker through their REST APIs,
/// records every link to the hosted-document service and writes the matches
/// out as CSV reports. It can also summarize the files one account owns in
/// cloud storage.
#[derive(Parser, Debug)]
#[command(name = "linkhound")]
#[command(version = "1.0.0")]
#[command(about = "Finds hosted-document links in wikis and issue trackers", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Plain-text run log
    #[arg(long, value_name = "FILE", default_value = "linkhound.log", global = true)]
    log_file: PathBuf,

    /// Validate configuration and show what would be crawled without any requests
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Crawl every wiki space and page
    Wiki,
    /// Crawl every issue tracker project and issue
    Tracker,
    /// Summarize the files owned by one cloud storage account
    Drive,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet, &cli.log_file)?;

    // Load and validate configuration
    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("Loading configuration from the environment"),
    }
    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    if cli.dry_run {
        return handle_dry_run(&config, cli.command);
    }

    match cli.command {
        Command::Wiki => {
            let stats = run_wiki(&config).await.context("Wiki crawl failed")?;
            tracing::info!("Wiki crawl completed");
            print_statistics(&stats);
        }
        Command::Tracker => {
            let stats = run_tracker(&config).await.context("Issue tracker crawl failed")?;
            tracing::info!("Issue tracker crawl completed");
            print_statistics(&stats);
        }
        Command::Drive => {
            let stats = run_drive(&config).await.context("Storage listing failed")?;
            let owner = config.drive.owner_email.as_deref().unwrap_or_default();
            print_drive_statistics(owner, &stats);
        }
    }

    Ok(())
}

/// Sets up the console and run-log subscribers based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, log_file: &Path) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkhound=info,warn"),
            1 => EnvFilter::new("linkhound=debug,info"),
            2 => EnvFilter::new("linkhound=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let file = File::create(log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    Ok(())
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, command: Command) -> anyhow::Result<()> {
    println!("=== Linkhound Dry Run ===\n");

    println!("Output:");
    println!("  Directory: {}", config.output.directory);

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!(
        "  Backoff: {}s x 2^n, clamped to {}s..{}s",
        config.retry.multiplier_secs, config.retry.min_delay_secs, config.retry.max_delay_secs
    );

    match command {
        Command::Wiki => {
            let settings = config.wiki_settings()?;
            println!("\nWiki:");
            println!("  {:#?}", settings);
            println!("\n✓ Configuration is valid");
            println!("✓ Would list spaces at {}/rest/api/space", settings.base_url);
        }
        Command::Tracker => {
            let settings = config.tracker_settings()?;
            println!("\nIssue Tracker:");
            println!("  {:#?}", settings);
            println!("\n✓ Configuration is valid");
            println!("✓ Would list projects at {}/rest/api/3/project", settings.base_url);
        }
        Command::Drive => {
            let settings = config.drive_settings()?;
            println!("\nCloud Storage:");
            println!("  {:#?}", settings);
            println!("\n✓ Configuration is valid");
            println!("✓ Would list files at {}/files", settings.api_base_url);
        }
    }

    Ok(())
}
