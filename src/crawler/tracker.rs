//! Issue tracker crawler
//!
//! Lists every project, pages through each project's issues and scans the
//! summary, description, comments, custom fields and environment of every
//! issue. Remote links are looked up per issue and reported last.

use crate::config::PlatformSettings;
use crate::crawler::fetcher::Fetch;
use crate::crawler::paginator::{Pagination, Paginator};
use crate::links::{field_links, is_remote_match, LinkKind, LinkMatch};
use crate::output::{RunStatistics, TrackerLinkRow};
use crate::LinkhoundError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Fields requested for every issue
const ISSUE_FIELDS: &str =
    "summary,description,comment,issuelinks,customfield_*,environment,issueType";

/// Prefix of custom field ids
const CUSTOM_FIELD_PREFIX: &str = "customfield_";

/// A project as returned by the project listing
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

/// An issue with its requested fields
///
/// Fields keep the order the API sent them in.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub key: String,
    pub fields: Map<String, Value>,
}

impl Issue {
    /// The summary line, or `N/A` when absent
    pub fn summary(&self) -> &str {
        self.fields
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or("N/A")
    }

    /// Bodies of the issue's comments, one entry per comment in list order
    ///
    /// A comment without a body still takes its position, so numbering
    /// follows the comment list.
    fn comment_bodies(&self) -> impl Iterator<Item = Option<&Value>> {
        self.fields
            .get("comment")
            .and_then(|c| c.get("comments"))
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(|comment| comment.get("body"))
    }

    /// Hosted-service links found in the issue's own fields
    ///
    /// Order: summary, description, comments, custom fields, environment.
    /// Remote links are not included.
    pub fn field_matches(&self) -> Vec<LinkMatch> {
        let mut found = Vec::new();
        let mut push = |value: Option<&Value>, kind: LinkKind| {
            if let Some(value) = value {
                found.extend(
                    field_links(value)
                        .into_iter()
                        .map(|url| LinkMatch::new(url, kind.clone())),
                );
            }
        };

        push(self.fields.get("summary"), LinkKind::Summary);
        push(self.fields.get("description"), LinkKind::Description);
        for (i, body) in self.comment_bodies().enumerate() {
            push(body, LinkKind::Comment(i + 1));
        }
        for (name, value) in &self.fields {
            if name.starts_with(CUSTOM_FIELD_PREFIX) {
                push(Some(value), LinkKind::Field(name.clone()));
            }
        }
        push(self.fields.get("environment"), LinkKind::Environment);

        found
    }
}

/// Everything one tracker crawl produced
#[derive(Debug, Clone)]
pub struct TrackerReport {
    pub links: Vec<TrackerLinkRow>,
    pub stats: RunStatistics,
}

/// Crawls projects and issues of one issue tracker site
pub struct TrackerCrawler<'a, F> {
    fetcher: &'a F,
    settings: &'a PlatformSettings,
}

impl<'a, F: Fetch> TrackerCrawler<'a, F> {
    pub fn new(fetcher: &'a F, settings: &'a PlatformSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Lists every project visible to the credential
    ///
    /// A failed lookup is logged and yields no projects.
    pub async fn list_projects(&self) -> Vec<Project> {
        let url = format!("{}/rest/api/3/project", self.settings.base_url);
        tracing::debug!("Requesting projects from {}", url);

        let data = match self.fetcher.fetch(&url, &[]).await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("Failed to fetch projects: {}", e);
                return Vec::new();
            }
        };

        match Vec::<Project>::deserialize(&data) {
            Ok(projects) => projects,
            Err(e) => {
                tracing::error!("Unexpected project listing from {}: {}", url, e);
                Vec::new()
            }
        }
    }

    /// Lists the raw records of every issue in a project
    pub async fn list_issues(&self, project_key: &str) -> Vec<Value> {
        let url = format!("{}/rest/api/3/search", self.settings.base_url);
        let jql = format!("project={}", project_key);
        let params = [("jql", jql.as_str()), ("fields", ISSUE_FIELDS)];

        let paginator = Paginator::new(
            self.fetcher,
            Pagination::Offset {
                page_size: self.settings.page_size,
                items_key: "issues",
            },
        );
        let resource = format!("issues for project {}", project_key);
        paginator.list_all(&url, &params, &resource).await
    }

    /// Looks up the remote link URLs attached to an issue
    ///
    /// Entries without an `object` are skipped; an `object` without a URL
    /// yields an empty string. A failed lookup is logged and yields nothing.
    pub async fn remote_links(&self, issue_key: &str) -> Vec<String> {
        let url = format!(
            "{}/rest/api/3/issue/{}/remotelink",
            self.settings.base_url, issue_key
        );
        tracing::debug!("Fetching remote links from {}", url);

        let data = match self.fetcher.fetch(&url, &[]).await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("Failed to fetch remote links for {}: {}", issue_key, e);
                return Vec::new();
            }
        };

        data.as_array()
            .into_iter()
            .flatten()
            .filter_map(|link| link.get("object"))
            .map(|object| {
                object
                    .get("url")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    /// Classifies every link of one raw issue record, remote links included
    ///
    /// # Errors
    ///
    /// Returns [`LinkhoundError::MalformedRecord`] if the record lacks a key or
    /// a field map. No remote lookup is made in that case.
    pub async fn issue_rows(
        &self,
        project_key: &str,
        record: &Value,
    ) -> Result<Vec<TrackerLinkRow>, LinkhoundError> {
        let issue = Issue::deserialize(record).map_err(|e| LinkhoundError::MalformedRecord {
            what: "issue",
            message: e.to_string(),
        })?;
        let summary = issue.summary();
        tracing::debug!("Processing issue {}: {}", issue.key, summary);

        let mut matches = issue.field_matches();

        let remote = self.remote_links(&issue.key).await;
        tracing::debug!("Remote links for {}: {:?}", issue.key, remote);
        for link in remote {
            if is_remote_match(&link) {
                tracing::info!("Found hosted link in {} (Remote Link): {}", issue.key, link);
                matches.push(LinkMatch::new(link, LinkKind::RemoteLink));
            } else {
                tracing::debug!("Remote link {} did not match the hosted-service pattern", link);
            }
        }

        Ok(matches
            .into_iter()
            .map(|found| {
                tracing::debug!("Found hosted link in {} ({}): {}", issue.key, found.kind, found.url);
                TrackerLinkRow {
                    project: project_key.to_string(),
                    issue_key: issue.key.clone(),
                    summary: summary.to_string(),
                    link: found.url,
                    source: found.kind.to_string(),
                }
            })
            .collect())
    }

    /// Crawls the whole site
    pub async fn crawl(&self) -> TrackerReport {
        let mut stats = RunStatistics::new("projects", "issues");
        let mut links = Vec::new();

        let projects = self.list_projects().await;
        if projects.is_empty() {
            tracing::error!("No projects found");
        }

        for project in &projects {
            tracing::info!("Processing project: {}", project.key);
            stats.containers += 1;

            let issues = self.list_issues(&project.key).await;
            for record in &issues {
                stats.items += 1;
                match self.issue_rows(&project.key, record).await {
                    Ok(rows) => {
                        for row in &rows {
                            stats.record_match(row.source.clone());
                        }
                        links.extend(rows);
                    }
                    Err(e) => {
                        let key = record.get("key").and_then(Value::as_str);
                        tracing::error!(
                            "Error processing issue {} in {}: {}",
                            key.unwrap_or("UNKNOWN"),
                            project.key,
                            e
                        );
                        stats.failed_items += 1;
                        links.push(TrackerLinkRow::error(&project.key, key, &e.to_string()));
                    }
                }
            }
        }

        TrackerReport { links, stats }
    }
}
