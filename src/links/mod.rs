//! Link classification for Linkhound
//!
//! This module decides which URLs point at the file-hosting service and how
//! they were authored: typed as literal text ("Hardcoded") or embedded as an
//! inline card ("Smart Link"). Issue-tracker matches are labeled by the caller
//! with the field they came from.

mod domain;
mod matcher;

use crate::extract::{extract, ContentNode};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

pub use domain::extract_host;
pub use matcher::{is_hosted_domain, is_hosted_url, matches_wildcard, HOSTED_DOMAINS};

/// Any absolute http(s) URL up to the next whitespace
static PLAIN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("hardcoded regex pattern is valid"));

/// Literal hosted-service URLs inside wiki storage markup
///
/// Stops at quotes and angle brackets so attribute and tag syntax is not
/// swallowed into the URL.
static MARKUP_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://(?:drive|docs)\.google\.com[^\s"'<>]+"#)
        .expect("hardcoded regex pattern is valid")
});

/// Inline-card macros whose card URL mentions the hosted service
static INLINE_CARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<ac:structured-macro[^>]*ac:name="inline-card"[^>]*data-card-url="([^"]*(?:drive|docs)\.google\.com[^"]*)""#,
    )
    .expect("hardcoded regex pattern is valid")
});

/// Hosted-service URLs attached to issues as remote links
static REMOTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:drive|docs)\.google\.com/\S+")
        .expect("hardcoded regex pattern is valid")
});

/// Where and how a matched link was found
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Literal URL in wiki markup
    Hardcoded,
    /// Inline-card embed in wiki markup
    SmartLink,
    /// Issue summary line
    Summary,
    /// Issue description document
    Description,
    /// Issue comment, numbered from 1
    Comment(usize),
    /// Custom issue field, by field id
    Field(String),
    /// Issue environment field
    Environment,
    /// Remote link attached to the issue
    RemoteLink,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hardcoded => f.write_str("Hardcoded"),
            Self::SmartLink => f.write_str("Smart Link"),
            Self::Summary => f.write_str("Summary"),
            Self::Description => f.write_str("Description"),
            Self::Comment(n) => write!(f, "Comment {}", n),
            Self::Field(name) => write!(f, "Field: {}", name),
            Self::Environment => f.write_str("Environment"),
            Self::RemoteLink => f.write_str("Remote Link"),
        }
    }
}

/// A hosted-service URL together with how it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    pub url: String,
    pub kind: LinkKind,
}

impl LinkMatch {
    pub fn new(url: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

/// Classifies links in wiki storage-format markup
///
/// Literal URLs are reported first as [`LinkKind::Hardcoded`], then inline
/// cards as [`LinkKind::SmartLink`], each in document order. A literal match
/// that sits inside an inline card's `data-card-url` attribute is the card
/// itself and is not reported twice.
///
/// # Examples
///
/// ```
/// use linkhound::links::{classify_markup, LinkKind};
///
/// let found = classify_markup("<p>https://drive.google.com/file/d/123/view</p>");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].url, "https://drive.google.com/file/d/123/view");
/// assert_eq!(found[0].kind, LinkKind::Hardcoded);
/// ```
pub fn classify_markup(markup: &str) -> Vec<LinkMatch> {
    let cards: Vec<(Range<usize>, &str)> = INLINE_CARD
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.range(), m.as_str()))
        .collect();

    let mut found: Vec<LinkMatch> = MARKUP_URL
        .find_iter(markup)
        .filter(|m| !cards.iter().any(|(span, _)| span.contains(&m.start())))
        .map(|m| m.as_str())
        .filter(|url| is_hosted_url(url))
        .map(|url| LinkMatch::new(url, LinkKind::Hardcoded))
        .collect();

    found.extend(
        cards
            .iter()
            .map(|(_, url)| *url)
            .filter(|url| is_hosted_url(url))
            .map(|url| LinkMatch::new(url, LinkKind::SmartLink)),
    );

    found
}

/// Finds hosted-service URLs in plain text
///
/// The match runs to the next whitespace, so trailing punctuation stays
/// attached to the URL.
pub fn scan_text(text: &str) -> Vec<String> {
    PLAIN_URL
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|url| is_hosted_url(url))
        .map(str::to_string)
        .collect()
}

/// Finds hosted-service URLs in one issue field
///
/// Strings are scanned directly. Objects and lists are treated as rich-text
/// documents: their extracted text is scanned first, then the links carried
/// by link marks and inline cards are appended. Other values yield nothing.
/// Duplicates between the two sources are kept.
pub fn field_links(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => scan_text(text),
        Value::Object(_) | Value::Array(_) => {
            let extracted = extract(&ContentNode::from(value));
            let mut found = scan_text(&extracted.text);
            found.extend(
                extracted
                    .links
                    .into_iter()
                    .filter(|link| is_hosted_url(link)),
            );
            found
        }
        _ => Vec::new(),
    }
}

/// Returns true if a remote link URL points at the hosted service
///
/// The whole remote link is reported, so its own host must be recognized,
/// not just a URL embedded somewhere inside it.
pub fn is_remote_match(url: &str) -> bool {
    REMOTE_URL.is_match(url) && is_hosted_url(url)
}
