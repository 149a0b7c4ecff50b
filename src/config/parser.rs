use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads the configuration from an optional TOML file and the process environment
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use linkhound::config::load_config;
///
/// let config = load_config(None).unwrap();
/// println!("Reports go to: {}", config.output.directory);
/// ```
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    load_config_with_env(path, |name| std::env::var(name).ok())
}

/// Loads the configuration using a custom environment lookup
///
/// Variables that are set but empty are treated as unset.
pub fn load_config_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => Config::default(),
    };

    apply_env(&mut config, |name| lookup(name).filter(|v| !v.trim().is_empty()));

    validate(&config)?;

    Ok(config)
}

/// Overlays environment variables onto a configuration
fn apply_env<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let first = |names: &[&str]| names.iter().find_map(|name| lookup(name));

    if let Some(dir) = first(&["OUTPUT_DIR"]) {
        config.output.directory = dir;
    }

    if let Some(v) = first(&["CONFLUENCE_BASE_URL"]) {
        config.wiki.base_url = Some(v);
    }
    if let Some(v) = first(&["CONFLUENCE_USERNAME", "USERNAME"]) {
        config.wiki.username = Some(v);
    }
    if let Some(v) = first(&["CONFLUENCE_API_TOKEN", "API_TOKEN"]) {
        config.wiki.api_token = Some(v);
    }

    if let Some(v) = first(&["JIRA_BASE_URL"]) {
        config.tracker.base_url = Some(v);
    }
    if let Some(v) = first(&["JIRA_USERNAME"]) {
        config.tracker.username = Some(v);
    }
    if let Some(v) = first(&["JIRA_API_TOKEN"]) {
        config.tracker.api_token = Some(v);
    }

    if let Some(v) = first(&["DRIVE_API_BASE_URL"]) {
        config.drive.api_base_url = v;
    }
    if let Some(v) = first(&["DRIVE_OWNER_EMAIL"]) {
        config.drive.owner_email = Some(v);
    }
    if let Some(v) = first(&["DRIVE_ACCESS_TOKEN"]) {
        config.drive.access_token = Some(v);
    }
}
