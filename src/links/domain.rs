use url::Url;

/// Extracts the lowercase host from a candidate URL string
///
/// Candidates come straight out of regex matches, so they may carry trailing
/// punctuation. The host survives that; anything that does not parse as an
/// absolute URL with a host yields `None`.
///
/// # Examples
///
/// ```
/// use linkhound::links::extract_host;
///
/// assert_eq!(
///     extract_host("https://Drive.Google.com/file/d/1/view"),
///     Some("drive.google.com".to_string())
/// );
/// assert_eq!(extract_host("not a url"), None);
/// ```
pub fn extract_host(candidate: &str) -> Option<String> {
    let url = Url::parse(candidate).ok()?;
    url.host_str().map(|h| h.to_lowercase())
}
