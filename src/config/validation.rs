use crate::config::types::{Config, DriveSettings, PlatformConfig, PlatformSettings, RetryConfig};
use crate::ConfigError;
use url::Url;

/// Largest page size accepted for any paginated endpoint
const MAX_PAGE_SIZE: u32 = 1000;

/// Validates the entire configuration
///
/// Presence of credentials is not checked here; each command asks for the
/// section it needs through [`Config::wiki_settings`] and friends.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_retry_config(&config.retry)?;

    if config.output.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    validate_platform_config("wiki", &config.wiki)?;
    validate_platform_config("tracker", &config.tracker)?;

    validate_page_size("drive", config.drive.page_size)?;
    validate_base_url("drive", &config.drive.api_base_url)?;

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.min_delay_secs > config.max_delay_secs {
        return Err(ConfigError::Validation(format!(
            "min-delay-secs ({}) cannot exceed max-delay-secs ({})",
            config.min_delay_secs, config.max_delay_secs
        )));
    }

    Ok(())
}

fn validate_platform_config(section: &str, config: &PlatformConfig) -> Result<(), ConfigError> {
    validate_page_size(section, config.page_size)?;

    if let Some(base_url) = &config.base_url {
        validate_base_url(section, base_url)?;
    }

    Ok(())
}

fn validate_page_size(section: &str, page_size: u32) -> Result<(), ConfigError> {
    if page_size < 1 || page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "{} page-size must be between 1 and {}, got {}",
            section, MAX_PAGE_SIZE, page_size
        )));
    }
    Ok(())
}

/// Validates that a base URL parses and uses an HTTP scheme
fn validate_base_url(section: &str, base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{} base URL '{}': {}", section, base_url, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} base URL '{}' must use http or https",
            section, base_url
        )));
    }

    Ok(())
}

/// Resolves a platform section, naming every variable that is still missing
fn resolve_platform(
    config: &PlatformConfig,
    names: [&'static str; 3],
) -> Result<PlatformSettings, ConfigError> {
    let [url_var, user_var, token_var] = names;
    let mut missing = Vec::new();

    if config.base_url.is_none() {
        missing.push(url_var);
    }
    if config.username.is_none() {
        missing.push(user_var);
    }
    if config.api_token.is_none() {
        missing.push(token_var);
    }

    match (&config.base_url, &config.username, &config.api_token) {
        (Some(base_url), Some(username), Some(api_token)) => Ok(PlatformSettings {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.clone(),
            api_token: api_token.clone(),
            page_size: config.page_size as usize,
        }),
        _ => Err(ConfigError::Missing(missing)),
    }
}

impl Config {
    /// Returns the wiki connection, or the list of missing variables
    pub fn wiki_settings(&self) -> Result<PlatformSettings, ConfigError> {
        resolve_platform(
            &self.wiki,
            ["CONFLUENCE_BASE_URL", "CONFLUENCE_USERNAME", "CONFLUENCE_API_TOKEN"],
        )
    }

    /// Returns the issue-tracker connection, or the list of missing variables
    pub fn tracker_settings(&self) -> Result<PlatformSettings, ConfigError> {
        resolve_platform(
            &self.tracker,
            ["JIRA_BASE_URL", "JIRA_USERNAME", "JIRA_API_TOKEN"],
        )
    }

    /// Returns the cloud storage connection, or the list of missing variables
    pub fn drive_settings(&self) -> Result<DriveSettings, ConfigError> {
        let mut missing = Vec::new();
        if self.drive.access_token.is_none() {
            missing.push("DRIVE_ACCESS_TOKEN");
        }
        if self.drive.owner_email.is_none() {
            missing.push("DRIVE_OWNER_EMAIL");
        }

        match (&self.drive.access_token, &self.drive.owner_email) {
            (Some(access_token), Some(owner_email)) => Ok(DriveSettings {
                api_base_url: self.drive.api_base_url.trim_end_matches('/').to_string(),
                owner_email: owner_email.clone(),
                access_token: access_token.clone(),
                page_size: self.drive.page_size as usize,
            }),
            _ => Err(ConfigError::Missing(missing)),
        }
    }
}
