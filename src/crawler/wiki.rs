//! Wiki crawler
//!
//! Lists every space, pages through each space's current pages with their
//! storage-format bodies, and classifies the hosted-service links found in
//! each body.

use crate::config::PlatformSettings;
use crate::crawler::fetcher::Fetch;
use crate::crawler::paginator::{Pagination, Paginator};
use crate::links::classify_markup;
use crate::output::{RunStatistics, SpaceRow, WikiLinkRow};
use crate::LinkhoundError;
use serde::Deserialize;
use serde_json::Value;

/// A wiki space as returned by the space listing
#[derive(Debug, Clone, Deserialize)]
pub struct Space {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

/// A page with its storage body and version expanded
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub version: PageVersion,
    pub body: PageBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageVersion {
    /// Timestamp of the last edit
    pub when: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageBody {
    pub storage: StorageFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageFormat {
    pub value: String,
}

/// Everything one wiki crawl produced
#[derive(Debug, Clone)]
pub struct WikiReport {
    pub spaces: Vec<SpaceRow>,
    pub links: Vec<WikiLinkRow>,
    pub stats: RunStatistics,
}

/// Crawls spaces and pages of one wiki site
pub struct WikiCrawler<'a, F> {
    fetcher: &'a F,
    settings: &'a PlatformSettings,
}

impl<'a, F: Fetch> WikiCrawler<'a, F> {
    pub fn new(fetcher: &'a F, settings: &'a PlatformSettings) -> Self {
        Self { fetcher, settings }
    }

    fn paginator(&self) -> Paginator<'a, F> {
        Paginator::new(
            self.fetcher,
            Pagination::NextLink {
                site_url: self.settings.base_url.clone(),
            },
        )
    }

    /// Lists every space on the site
    ///
    /// Records without a key are skipped with a warning.
    pub async fn list_spaces(&self) -> Vec<Space> {
        let url = format!("{}/rest/api/space", self.settings.base_url);
        let limit = self.settings.page_size.to_string();

        let records = self
            .paginator()
            .list_all(&url, &[("limit", &limit)], "spaces")
            .await;

        let spaces: Vec<Space> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Space>(record) {
                Ok(space) => Some(space),
                Err(e) => {
                    tracing::warn!("Skipping malformed space record: {}", e);
                    None
                }
            })
            .collect();

        for space in &spaces {
            tracing::info!("Space Key: {}, Name: {}", space.key, space.name);
        }
        tracing::info!("Total spaces found: {}", spaces.len());

        spaces
    }

    /// Lists the raw records of every current page in a space
    pub async fn list_pages(&self, space_key: &str) -> Vec<Value> {
        let url = format!("{}/rest/api/content", self.settings.base_url);
        let limit = self.settings.page_size.to_string();
        let params = [
            ("type", "page"),
            ("spaceKey", space_key),
            ("expand", "body.storage,version"),
            ("status", "current"),
            ("limit", limit.as_str()),
        ];

        let resource = format!("pages in space {}", space_key);
        let pages = self.paginator().list_all(&url, &params, &resource).await;
        tracing::info!("Total pages found in {}: {}", space_key, pages.len());
        pages
    }

    /// Builds the human-readable locator of a page
    pub fn page_locator(&self, space_key: &str, page: &Page) -> String {
        format!(
            "{}/spaces/{}/pages/{}/{}",
            self.settings.base_url,
            space_key,
            page.id,
            page.title.replace(' ', "-")
        )
    }

    /// Classifies the links of one raw page record
    ///
    /// # Errors
    ///
    /// Returns [`LinkhoundError::MalformedRecord`] if the record lacks an id,
    /// title, version or storage body.
    pub fn page_rows(&self, space_key: &str, record: &Value) -> Result<Vec<WikiLinkRow>, LinkhoundError> {
        let page = Page::deserialize(record).map_err(|e| LinkhoundError::MalformedRecord {
            what: "page",
            message: e.to_string(),
        })?;

        tracing::debug!("Processing page: {} ({})", page.title, page.id);
        let locator = self.page_locator(space_key, &page);

        let rows: Vec<WikiLinkRow> = classify_markup(&page.body.storage.value)
            .into_iter()
            .map(|found| {
                tracing::debug!("Found {} link in {}: {}", found.kind, page.title, found.url);
                WikiLinkRow {
                    site: space_key.to_string(),
                    page: page.title.clone(),
                    link: found.url,
                    link_type: found.kind.to_string(),
                    text: locator.clone(),
                    last_modified: page.version.when.clone(),
                }
            })
            .collect();

        if rows.is_empty() {
            tracing::debug!("No hosted links found in {}", page.title);
        }
        Ok(rows)
    }

    /// Crawls the whole site
    pub async fn crawl(&self) -> WikiReport {
        let mut stats = RunStatistics::new("spaces", "pages");
        let mut links = Vec::new();

        let spaces = self.list_spaces().await;
        if spaces.is_empty() {
            tracing::error!("No spaces retrieved");
        }

        for space in &spaces {
            tracing::debug!("Processing space: {}", space.key);
            stats.containers += 1;

            let pages = self.list_pages(&space.key).await;
            if pages.is_empty() {
                tracing::warn!("No pages found in space {}. Skipping.", space.key);
                continue;
            }

            for record in &pages {
                stats.items += 1;
                match self.page_rows(&space.key, record) {
                    Ok(rows) => {
                        for row in &rows {
                            stats.record_match(row.link_type.clone());
                        }
                        links.extend(rows);
                    }
                    Err(e) => {
                        let title = record.get("title").and_then(Value::as_str);
                        tracing::error!(
                            "Error processing page {} in {}: {}",
                            title.unwrap_or("UNKNOWN"),
                            space.key,
                            e
                        );
                        stats.failed_items += 1;
                        links.push(WikiLinkRow::error(&space.key, title, &e.to_string()));
                    }
                }
            }
        }

        WikiReport {
            spaces: spaces
                .into_iter()
                .map(|space| SpaceRow {
                    key: space.key,
                    name: space.name,
                })
                .collect(),
            links,
            stats,
        }
    }
}
