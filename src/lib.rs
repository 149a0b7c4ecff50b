//! Linkhound: a file-hosting link auditor
//!
//! This crate crawls a wiki platform, an issue tracker and a cloud storage API,
//! finding links that point at the hosted-document service and writing them
//! out as flat CSV reports.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod links;
pub mod output;

use thiserror::Error;

/// Main error type for Linkhound operations
#[derive(Debug, Error)]
pub enum LinkhoundError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Report error: {0}")]
    Report(#[from] output::ReportError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Malformed {what}: {message}")]
    MalformedRecord { what: &'static str, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised by a single API request
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Rate limit exceeded for {url}")]
    RateLimited { url: String },

    #[error("HTTP {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Invalid JSON from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    /// Returns true if another attempt may succeed
    ///
    /// Rate limiting, server-side failures and transport problems are transient.
    /// Client errors and undecodable bodies are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Transport { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode { .. } => false,
        }
    }
}

/// Result type alias for Linkhound operations
pub type Result<T> = std::result::Result<T, LinkhoundError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for single fetches
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{extract, ContentNode, Extracted};
pub use links::{classify_markup, field_links, is_remote_match, scan_text, LinkKind, LinkMatch};
