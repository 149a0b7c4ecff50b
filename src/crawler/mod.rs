//! Crawler module for the three supported platforms
//!
//! This module contains the core crawling logic, including:
//! - Authenticated JSON fetching with retry logic
//! - Next-link, offset and page-token pagination
//! - The wiki, issue tracker and cloud storage crawlers
//! - Writing each crawl's reports

mod drive;
mod fetcher;
mod paginator;
mod tracker;
mod wiki;

pub use drive::{print_drive_statistics, DriveCrawler, DriveFile, DriveStatistics};
pub use fetcher::{build_http_client, Credential, Fetch, Fetcher, RetryPolicy};
pub use paginator::{Pagination, Paginator};
pub use tracker::{Issue, Project, TrackerCrawler, TrackerReport};
pub use wiki::{Page, Space, WikiCrawler, WikiReport};

use crate::config::Config;
use crate::output::{
    write_report, RunStatistics, SPACES_REPORT, TRACKER_LINKS_REPORT, WIKI_LINKS_REPORT,
};
use crate::Result;
use serde::Serialize;
use std::path::Path;

/// Crawls the wiki and writes the space and link reports
///
/// # Arguments
///
/// * `config` - The loaded configuration; must carry wiki credentials
///
/// # Returns
///
/// * `Ok(RunStatistics)` - Crawl finished; individual failures are counted
/// * `Err(LinkhoundError)` - Credentials missing, or a report could not be written
pub async fn run_wiki(config: &Config) -> Result<RunStatistics> {
    let settings = config.wiki_settings()?;
    let fetcher = Fetcher::new(
        build_http_client()?,
        Credential::from(&settings),
        RetryPolicy::from(&config.retry),
    );

    tracing::info!("Crawling wiki at {}", settings.base_url);
    let report = WikiCrawler::new(&fetcher, &settings).crawl().await;

    let mut stats = report.stats;
    let dir = Path::new(&config.output.directory);
    save(dir, SPACES_REPORT, &report.spaces, &mut stats)?;
    save(dir, WIKI_LINKS_REPORT, &report.links, &mut stats)?;
    Ok(stats)
}

/// Crawls the issue tracker and writes the link report
///
/// # Arguments
///
/// * `config` - The loaded configuration; must carry tracker credentials
pub async fn run_tracker(config: &Config) -> Result<RunStatistics> {
    let settings = config.tracker_settings()?;
    let fetcher = Fetcher::new(
        build_http_client()?,
        Credential::from(&settings),
        RetryPolicy::from(&config.retry),
    );

    tracing::info!("Crawling issue tracker at {}", settings.base_url);
    let report = TrackerCrawler::new(&fetcher, &settings).crawl().await;

    let mut stats = report.stats;
    let dir = Path::new(&config.output.directory);
    save(dir, TRACKER_LINKS_REPORT, &report.links, &mut stats)?;
    Ok(stats)
}

/// Lists the configured owner's files and aggregates them
pub async fn run_drive(config: &Config) -> Result<DriveStatistics> {
    let settings = config.drive_settings()?;
    let fetcher = Fetcher::new(
        build_http_client()?,
        Credential::Bearer(settings.access_token.clone()),
        RetryPolicy::from(&config.retry),
    );

    tracing::info!("Listing files owned by {}", settings.owner_email);
    Ok(DriveCrawler::new(&fetcher, &settings).crawl().await)
}

fn save<T: Serialize>(dir: &Path, file_name: &str, rows: &[T], stats: &mut RunStatistics) -> Result<()> {
    if let Some(path) = write_report(dir, file_name, rows)? {
        stats.reports.push(path.display().to_string());
    }
    Ok(())
}
