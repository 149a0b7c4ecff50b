//! Output module for reports and run summaries
//!
//! This module handles:
//! - The row schemas of every CSV report
//! - Writing rows to CSV files in the output directory
//! - Recording and printing run statistics

mod report;
mod rows;
pub mod stats;

pub use report::{write_report, ReportError};
pub use rows::{SpaceRow, TrackerLinkRow, WikiLinkRow};
pub use stats::{print_statistics, RunStatistics};

/// File name of the space directory report
pub const SPACES_REPORT: &str = "spaces_list.csv";

/// File name of the wiki link report
pub const WIKI_LINKS_REPORT: &str = "confluence_links.csv";

/// File name of the issue tracker link report
pub const TRACKER_LINKS_REPORT: &str = "jira_google_drive_links.csv";
