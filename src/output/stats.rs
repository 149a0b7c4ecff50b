//! Run statistics
//!
//! Counters gathered while a crawl runs, printed as a summary at the end.

use std::collections::BTreeMap;

/// Counters for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// What the containers are called, e.g. "spaces" or "projects"
    pub container_label: &'static str,

    /// What the items are called, e.g. "pages" or "issues"
    pub item_label: &'static str,

    /// Containers visited
    pub containers: u64,

    /// Items examined
    pub items: u64,

    /// Items that produced a sentinel error row
    pub failed_items: u64,

    /// Matched links keyed by link kind label
    pub matches_by_kind: BTreeMap<String, u64>,

    /// Report files written
    pub reports: Vec<String>,
}

impl RunStatistics {
    pub fn new(container_label: &'static str, item_label: &'static str) -> Self {
        Self {
            container_label,
            item_label,
            ..Self::default()
        }
    }

    /// Counts one match under its kind label
    pub fn record_match(&mut self, kind: impl Into<String>) {
        *self.matches_by_kind.entry(kind.into()).or_insert(0) += 1;
    }

    /// Total matches across all kinds
    pub fn total_matches(&self) -> u64 {
        self.matches_by_kind.values().sum()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Run Statistics ===\n");

    println!("Overview:");
    println!("  {} crawled: {}", capitalize(stats.container_label), stats.containers);
    println!("  {} examined: {}", capitalize(stats.item_label), stats.items);
    println!("  Failed {}: {}", stats.item_label, stats.failed_items);
    println!("  Links found: {}", stats.total_matches());
    println!();

    if !stats.matches_by_kind.is_empty() {
        println!("Links by Type:");
        // Sort kinds by count (descending)
        let mut kind_counts: Vec<_> = stats.matches_by_kind.iter().collect();
        kind_counts.sort_by(|a, b| b.1.cmp(a.1));

        let total = stats.total_matches();
        for (kind, count) in kind_counts {
            let percentage = (*count as f64 / total as f64) * 100.0;
            println!("  {}: {} ({:.1}%)", kind, count, percentage);
        }
        println!();
    }

    if stats.reports.is_empty() {
        println!("No report written");
    } else {
        println!("Reports:");
        for report in &stats.reports {
            println!("  - {}", report);
        }
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
