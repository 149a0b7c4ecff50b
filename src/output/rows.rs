use serde::Serialize;

/// One row of `spaces_list.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpaceRow {
    #[serde(rename = "Space Key")]
    pub key: String,
    #[serde(rename = "Space Name")]
    pub name: String,
}

/// One row of `confluence_links.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WikiLinkRow {
    /// Space key
    #[serde(rename = "Site")]
    pub site: String,
    /// Page title
    #[serde(rename = "Page")]
    pub page: String,
    /// The matched hosted-service URL
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Link Type")]
    pub link_type: String,
    /// Human-readable page locator, or the error message of a sentinel row
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Last Modified")]
    pub last_modified: String,
}

impl WikiLinkRow {
    /// Sentinel row for a page that could not be interpreted
    pub fn error(site: &str, page: Option<&str>, message: &str) -> Self {
        Self {
            site: site.to_string(),
            page: page.unwrap_or("UNKNOWN").to_string(),
            link: "ERROR".to_string(),
            link_type: "N/A".to_string(),
            text: message.to_string(),
            last_modified: "N/A".to_string(),
        }
    }
}

/// One row of `jira_google_drive_links.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerLinkRow {
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Issue Key")]
    pub issue_key: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Link")]
    pub link: String,
    /// Where on the issue the link was found
    #[serde(rename = "Source")]
    pub source: String,
}

impl TrackerLinkRow {
    /// Sentinel row for an issue that could not be interpreted
    pub fn error(project: &str, issue_key: Option<&str>, message: &str) -> Self {
        Self {
            project: project.to_string(),
            issue_key: issue_key.unwrap_or("ERROR").to_string(),
            summary: "ERROR".to_string(),
            link: "ERROR".to_string(),
            source: message.to_string(),
        }
    }
}
