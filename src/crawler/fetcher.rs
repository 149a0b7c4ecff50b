//! HTTP fetcher implementation
//!
//! This module handles every API request the crawlers make, including:
//! - Building the HTTP client
//! - Attaching Basic or Bearer credentials
//! - Retrying transient failures with exponential backoff
//! - Classifying responses into JSON documents or [`FetchError`]s

use crate::config::{PlatformSettings, RetryConfig};
use crate::{FetchError, FetchResult};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Authentication material for one API
#[derive(Clone)]
pub enum Credential {
    /// HTTP Basic with a username and API token
    Basic { username: String, api_token: String },
    /// OAuth access token
    Bearer(String),
}

impl Credential {
    /// Attaches the credential to a request
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic {
                username,
                api_token,
            } => request.basic_auth(username, Some(api_token)),
            Self::Bearer(token) => request.bearer_auth(token),
        }
    }
}

impl From<&PlatformSettings> for Credential {
    fn from(settings: &PlatformSettings) -> Self {
        Self::Basic {
            username: settings.username.clone(),
            api_token: settings.api_token.clone(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("api_token", &"<redacted>")
                .finish(),
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}

/// Exponential backoff schedule for retried requests
///
/// The delay after the n-th failed attempt is `multiplier * 2^(n-1)`,
/// clamped to `[min_delay, max_delay]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub multiplier: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// A policy that retries without sleeping
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            multiplier: Duration::ZERO,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Returns how long to wait after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.multiplier
            .saturating_mul(factor)
            .clamp(self.min_delay, self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(c: &RetryConfig) -> Self {
        Self {
            max_attempts: c.max_attempts,
            multiplier: Duration::from_secs(c.multiplier_secs),
            min_delay: Duration::from_secs(c.min_delay_secs),
            max_delay: Duration::from_secs(c.max_delay_secs),
        }
    }
}

/// A source of JSON documents
///
/// [`Fetcher`] is the HTTP implementation; the paginator and crawlers only
/// depend on this trait.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// Fetches one JSON document
    ///
    /// # Arguments
    ///
    /// * `url` - Fully-qualified endpoint URL
    /// * `params` - Query parameters; may be empty
    async fn fetch(&self, url: &str, params: &[(&str, &str)]) -> FetchResult<Value>;
}

/// Builds the HTTP client shared by all requests of a run
///
/// # Example
///
/// ```
/// use linkhound::crawler::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("linkhound/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Authenticated, retrying JSON fetcher
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Decode body as JSON |
/// | HTTP 429 | Retry with backoff |
/// | HTTP 5xx | Retry with backoff |
/// | Timeout / connection error | Retry with backoff |
/// | Other non-2xx | Fail immediately with status and body |
/// | Undecodable body | Fail immediately |
///
/// Once the attempts are exhausted, the last error is returned.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    credential: Credential,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(client: Client, credential: Credential, retry: RetryPolicy) -> Self {
        Self {
            client,
            credential,
            retry,
        }
    }

    /// Sends a single request
    ///
    /// The body is read to the end on every path that has one, so the
    /// connection goes back to the pool before the next attempt.
    async fn attempt(&self, url: &str, params: &[(&str, &str)]) -> FetchResult<Value> {
        let mut request = self
            .credential
            .apply(self.client.get(url))
            .header(ACCEPT, "application/json");
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            // Drain so the connection can be reused for the retry
            let _ = response.bytes().await;
            tracing::warn!("Rate limit exceeded for {}", url);
            return Err(FetchError::RateLimited {
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            tracing::error!("Error {} from {}: {}", status.as_u16(), url, body);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl Fetch for Fetcher {
    async fn fetch(&self, url: &str, params: &[(&str, &str)]) -> FetchResult<Value> {
        let mut attempt = 1;
        loop {
            tracing::info!(attempt, ?params, "Fetching URL: {}", url);

            match self.attempt(url, params).await {
                Ok(document) => return Ok(document),
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        "{} (attempt {}/{}), retrying in {:?}",
                        e,
                        attempt,
                        self.retry.max_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
