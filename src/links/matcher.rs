use crate::links::domain::extract_host;

/// Hosts of the file-hosting service whose links are reported
pub const HOSTED_DOMAINS: &[&str] = &["drive.google.com", "docs.google.com"];

/// Checks if a domain matches a wildcard pattern
///
/// This function supports two types of patterns:
/// 1. Exact match: "drive.google.com" matches only "drive.google.com"
/// 2. Wildcard match: "*.drive.google.com" matches the bare domain and any
///    subdomain of it
///
/// # Examples
///
/// ```
/// use linkhound::links::matches_wildcard;
///
/// assert!(matches_wildcard("docs.google.com", "docs.google.com"));
/// assert!(matches_wildcard("*.docs.google.com", "docs.google.com"));
/// assert!(matches_wildcard("*.docs.google.com", "eu.docs.google.com"));
/// assert!(!matches_wildcard("*.docs.google.com", "docs.google.com.evil.test"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        candidate == base || candidate.ends_with(&format!(".{}", base))
    } else {
        candidate == pattern
    }
}

/// Returns true if the host belongs to the file-hosting service
pub fn is_hosted_domain(host: &str) -> bool {
    HOSTED_DOMAINS
        .iter()
        .any(|domain| matches_wildcard(&format!("*.{}", domain), host))
}

/// Returns true if the candidate URL's host belongs to the file-hosting service
///
/// Only the host is inspected, so a recognized domain appearing in a path or
/// query string does not count.
pub fn is_hosted_url(candidate: &str) -> bool {
    extract_host(candidate)
        .map(|host| is_hosted_domain(&host))
        .unwrap_or(false)
}
