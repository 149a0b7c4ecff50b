//! Configuration module for Linkhound
//!
//! Settings come from an optional TOML file with environment variables
//! layered on top. Credentials are normally supplied through the environment.
//!
//! # Example
//!
//! ```no_run
//! use linkhound::config::load_config;
//!
//! let config = load_config(None).unwrap();
//! let wiki = config.wiki_settings().unwrap();
//! println!("Crawling {}", wiki.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DriveConfig, DriveSettings, OutputConfig, PlatformConfig, PlatformSettings,
    RetryConfig, DEFAULT_DRIVE_API_BASE_URL,
};

// Re-export parser functions
pub use parser::{load_config, load_config_with_env};
