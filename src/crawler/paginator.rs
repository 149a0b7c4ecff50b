//! Pagination over list endpoints
//!
//! Each platform pages its results differently:
//! - the wiki returns a relative `_links.next` URL to follow
//! - the issue tracker takes a `startAt` offset and stops on a short page
//! - the storage API returns an opaque `nextPageToken`
//!
//! All three stop early on an empty page or on a failed fetch, returning
//! whatever was accumulated so far.

use crate::crawler::fetcher::Fetch;
use serde_json::Value;

/// How a list endpoint is paged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pagination {
    /// Follow `_links.next`, resolved against the site root
    NextLink { site_url: String },

    /// Advance `startAt` page by page until a page is short
    ///
    /// A page is short relative to the `maxResults` the server echoes back,
    /// which may be lower than the requested `page_size`.
    Offset {
        page_size: usize,
        items_key: &'static str,
    },

    /// Pass `nextPageToken` back as `pageToken` until it is absent
    PageToken { items_key: &'static str },
}

/// Drives a [`Fetch`] implementation across a paged result set
pub struct Paginator<'a, F> {
    fetcher: &'a F,
    style: Pagination,
}

impl<'a, F: Fetch> Paginator<'a, F> {
    pub fn new(fetcher: &'a F, style: Pagination) -> Self {
        Self { fetcher, style }
    }

    /// Collects every record reachable from the seed URL
    ///
    /// # Arguments
    ///
    /// * `seed_url` - URL of the first page
    /// * `params` - Query parameters for the first page (and, for offset and
    ///   token styles, every page)
    /// * `resource` - Human-readable name used in log lines
    ///
    /// # Returns
    ///
    /// All records in the order received. Never fails: fetch errors end the
    /// loop and are logged.
    pub async fn list_all(&self, seed_url: &str, params: &[(&str, &str)], resource: &str) -> Vec<Value> {
        match &self.style {
            Pagination::NextLink { site_url } => {
                self.list_next_link(site_url, seed_url, params, resource).await
            }
            Pagination::Offset {
                page_size,
                items_key,
            } => {
                self.list_offset(*page_size, items_key, seed_url, params, resource)
                    .await
            }
            Pagination::PageToken { items_key } => {
                self.list_page_token(items_key, seed_url, params, resource)
                    .await
            }
        }
    }

    async fn list_next_link(
        &self,
        site_url: &str,
        seed_url: &str,
        params: &[(&str, &str)],
        resource: &str,
    ) -> Vec<Value> {
        let mut records = Vec::new();
        let mut next = Some(seed_url.to_string());
        let mut first = true;

        while let Some(url) = next.take() {
            // Next links already carry their own query string
            let page_params: &[(&str, &str)] = if first { params } else { &[] };
            first = false;

            let data = match self.fetcher.fetch(&url, page_params).await {
                Ok(data) => data,
                Err(e) => {
                    tracing::error!("Failed to fetch {}: {}", resource, e);
                    break;
                }
            };

            let Some(batch) = non_empty_items(&data, "results") else {
                tracing::warn!("No {} found", resource);
                break;
            };
            records.extend(batch.iter().cloned());

            next = data
                .pointer("/_links/next")
                .and_then(Value::as_str)
                .map(|link| resolve_next(site_url, link));
        }

        records
    }

    async fn list_offset(
        &self,
        page_size: usize,
        items_key: &str,
        url: &str,
        params: &[(&str, &str)],
        resource: &str,
    ) -> Vec<Value> {
        let mut records = Vec::new();
        let mut start_at = 0usize;
        let max_results = page_size.to_string();

        loop {
            let start = start_at.to_string();
            let mut page_params = params.to_vec();
            page_params.push(("startAt", start.as_str()));
            page_params.push(("maxResults", max_results.as_str()));

            let data = match self.fetcher.fetch(url, &page_params).await {
                Ok(data) => data,
                Err(e) => {
                    tracing::error!("Failed to fetch {} at offset {}: {}", resource, start_at, e);
                    break;
                }
            };

            let Some(batch) = non_empty_items(&data, items_key) else {
                tracing::warn!("No {} found at offset {}", resource, start_at);
                break;
            };
            tracing::info!("Retrieved {} {}", batch.len(), resource);
            records.extend(batch.iter().cloned());

            // The server may serve fewer per page than were asked for
            let served = data
                .get("maxResults")
                .and_then(Value::as_u64)
                .and_then(|n| usize::try_from(n).ok())
                .filter(|n| *n > 0)
                .map_or(page_size, |n| n.min(page_size));
            if batch.len() < served {
                break;
            }
            start_at += batch.len();
        }

        records
    }

    async fn list_page_token(
        &self,
        items_key: &str,
        url: &str,
        params: &[(&str, &str)],
        resource: &str,
    ) -> Vec<Value> {
        let mut records = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let mut page_params = params.to_vec();
            if let Some(token) = token.as_deref() {
                page_params.push(("pageToken", token));
            }

            let data = match self.fetcher.fetch(url, &page_params).await {
                Ok(data) => data,
                Err(e) => {
                    tracing::error!("Failed to fetch {}: {}", resource, e);
                    break;
                }
            };

            let Some(batch) = non_empty_items(&data, items_key) else {
                tracing::warn!("No {} found", resource);
                break;
            };
            records.extend(batch.iter().cloned());

            match data.get("nextPageToken").and_then(Value::as_str) {
                Some(next) if !next.is_empty() => token = Some(next.to_string()),
                _ => break,
            }
        }

        records
    }
}

/// Returns the item array under `key`, or `None` if it is missing or empty
fn non_empty_items<'v>(data: &'v Value, key: &str) -> Option<&'v Vec<Value>> {
    data.get(key)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
}

/// Resolves a `_links.next` value against the site root
fn resolve_next(site_url: &str, link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else {
        format!("{}{}", site_url, link)
    }
}
