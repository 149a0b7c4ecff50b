use serde::Deserialize;
use std::fmt;

/// Default location of the Drive v3 REST API
pub const DEFAULT_DRIVE_API_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Main configuration structure for Linkhound
///
/// Every section is optional in the TOML file; environment variables are
/// layered on top by the parser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub wiki: PlatformConfig,
    #[serde(default)]
    pub tracker: PlatformConfig,
    #[serde(default)]
    pub drive: DriveConfig,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives the CSV reports
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_output_directory() -> String {
    "data".to_string()
}

/// Retry behavior for API requests
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Total attempts per request, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base of the exponential backoff (seconds)
    #[serde(default = "default_multiplier_secs")]
    pub multiplier_secs: u64,

    /// Lower bound for a single backoff delay (seconds)
    #[serde(default = "default_min_delay_secs")]
    pub min_delay_secs: u64,

    /// Upper bound for a single backoff delay (seconds)
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            multiplier_secs: default_multiplier_secs(),
            min_delay_secs: default_min_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_multiplier_secs() -> u64 {
    1
}

fn default_min_delay_secs() -> u64 {
    2
}

fn default_max_delay_secs() -> u64 {
    10
}

/// Connection details for the wiki or the issue tracker
///
/// Fields are optional here because they usually arrive through the
/// environment; see [`PlatformSettings`] for the resolved form.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformConfig {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub api_token: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            username: None,
            api_token: None,
            page_size: default_page_size(),
        }
    }
}

impl fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("page_size", &self.page_size)
            .finish()
    }
}

fn default_page_size() -> u32 {
    100
}

/// Connection details for the cloud storage API
#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DriveConfig {
    #[serde(default = "default_drive_api_base_url")]
    pub api_base_url: String,
    pub owner_email: Option<String>,
    pub access_token: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_drive_api_base_url(),
            owner_email: None,
            access_token: None,
            page_size: default_page_size(),
        }
    }
}

impl fmt::Debug for DriveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveConfig")
            .field("api_base_url", &self.api_base_url)
            .field("owner_email", &self.owner_email)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("page_size", &self.page_size)
            .finish()
    }
}

fn default_drive_api_base_url() -> String {
    DEFAULT_DRIVE_API_BASE_URL.to_string()
}

/// Fully resolved wiki or issue-tracker connection
#[derive(Clone, PartialEq, Eq)]
pub struct PlatformSettings {
    /// Site root without a trailing slash
    pub base_url: String,
    pub username: String,
    pub api_token: String,
    pub page_size: usize,
}

impl fmt::Debug for PlatformSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformSettings")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_token", &"<redacted>")
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// Fully resolved cloud storage connection
#[derive(Clone, PartialEq, Eq)]
pub struct DriveSettings {
    pub api_base_url: String,
    pub owner_email: String,
    pub access_token: String,
    pub page_size: usize,
}

impl fmt::Debug for DriveSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveSettings")
            .field("api_base_url", &self.api_base_url)
            .field("owner_email", &self.owner_email)
            .field("access_token", &"<redacted>")
            .field("page_size", &self.page_size)
            .finish()
    }
}
