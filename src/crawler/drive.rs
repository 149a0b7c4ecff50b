//! Cloud storage statistics
//!
//! Lists the files owned by one account and aggregates them into counts per
//! MIME type, total size, shared files and the most recent modification.

use crate::config::DriveSettings;
use crate::crawler::fetcher::Fetch;
use crate::crawler::paginator::{Pagination, Paginator};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Partial response selector for the file listing
const FILE_FIELDS: &str = "nextPageToken,files(id,name,mimeType,createdTime,modifiedTime,size,shared)";

/// MIME type recorded when a file has none
const UNKNOWN_MIME_TYPE: &str = "unknown";

/// File metadata as returned by the listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub mime_type: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub modified_time: Option<DateTime<Utc>>,
    /// Size in bytes, sent as a decimal string; absent for native documents
    pub size: Option<String>,
    #[serde(default)]
    pub shared: bool,
}

impl DriveFile {
    /// Size in bytes, zero when absent or unparsable
    pub fn size_bytes(&self) -> u64 {
        self.size
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }
}

/// Aggregate statistics over a set of files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriveStatistics {
    pub total_files: u64,
    pub file_types: BTreeMap<String, u64>,
    pub total_size: u64,
    pub shared_files: u64,
    /// Files skipped because their metadata could not be read
    pub malformed_files: u64,
    pub latest_modification: Option<DateTime<Utc>>,
}

impl DriveStatistics {
    /// Aggregates a file listing
    pub fn from_files<'f>(files: impl IntoIterator<Item = &'f DriveFile>) -> Self {
        let mut stats = Self::default();
        for file in files {
            stats.total_files += 1;
            let mime_type = file.mime_type.as_deref().unwrap_or(UNKNOWN_MIME_TYPE);
            *stats.file_types.entry(mime_type.to_string()).or_insert(0) += 1;
            stats.total_size += file.size_bytes();
            if file.shared {
                stats.shared_files += 1;
            }
            stats.latest_modification = stats.latest_modification.max(file.modified_time);
        }
        stats
    }
}

/// Prints storage statistics to stdout
pub fn print_drive_statistics(owner_email: &str, stats: &DriveStatistics) {
    println!("=== Storage Statistics for {} ===\n", owner_email);

    println!("Overview:");
    println!("  Total files: {}", stats.total_files);
    println!("  Total size: {} bytes", stats.total_size);
    println!("  Shared files: {}", stats.shared_files);
    match stats.latest_modification {
        Some(when) => println!("  Last modified: {}", when.to_rfc3339()),
        None => println!("  Last modified: N/A"),
    }
    if stats.malformed_files > 0 {
        println!("  Unreadable entries: {}", stats.malformed_files);
    }
    println!();

    if !stats.file_types.is_empty() {
        println!("Files by Type:");
        let mut type_counts: Vec<_> = stats.file_types.iter().collect();
        type_counts.sort_by(|a, b| b.1.cmp(a.1));
        for (mime_type, count) in type_counts {
            println!("  {}: {}", mime_type, count);
        }
    }
}

/// Lists the files of one owner
pub struct DriveCrawler<'a, F> {
    fetcher: &'a F,
    settings: &'a DriveSettings,
}

impl<'a, F: Fetch> DriveCrawler<'a, F> {
    pub fn new(fetcher: &'a F, settings: &'a DriveSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Search query selecting the owner's files outside the trash
    pub fn owner_query(&self) -> String {
        format!(
            "'{}' in owners and trashed=false",
            self.settings.owner_email.replace('\'', "\\'")
        )
    }

    /// Lists and aggregates every file owned by the configured account
    pub async fn crawl(&self) -> DriveStatistics {
        let url = format!("{}/files", self.settings.api_base_url);
        let query = self.owner_query();
        let page_size = self.settings.page_size.to_string();
        let params = [
            ("q", query.as_str()),
            ("spaces", "drive"),
            ("fields", FILE_FIELDS),
            ("pageSize", page_size.as_str()),
        ];

        let paginator = Paginator::new(self.fetcher, Pagination::PageToken { items_key: "files" });
        let records = paginator.list_all(&url, &params, "files").await;

        let mut malformed = 0;
        let files: Vec<DriveFile> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value(record) {
                Ok(file) => Some(file),
                Err(e) => {
                    tracing::warn!("Skipping unreadable file entry: {}", e);
                    malformed += 1;
                    None
                }
            })
            .collect();
        tracing::info!("Retrieved {} files for {}", files.len(), self.settings.owner_email);

        let mut stats = DriveStatistics::from_files(&files);
        stats.malformed_files = malformed;
        stats
    }
}
