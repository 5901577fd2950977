use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the host from a URL string
///
/// The `url` crate lowercases registered hosts during parsing, so the
/// returned host is already lowercase.
///
/// # Arguments
///
/// * `url` - The URL to extract the host from
///
/// # Returns
///
/// * `Ok(String)` - The host component
/// * `Err(UrlError)` - The URL could not be parsed or has no host
///
/// # Examples
///
/// ```
/// use shopmap::url::host_of;
///
/// assert_eq!(host_of("https://example.com/path").unwrap(), "example.com");
/// assert_eq!(host_of("https://WWW.Example.COM/").unwrap(), "www.example.com");
/// assert!(host_of("not a url").is_err());
/// ```
pub fn host_of(url: &str) -> UrlResult<String> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;
    parsed
        .host_str()
        .map(|h| h.to_string())
        .ok_or(UrlError::MissingHost)
}

/// Normalizes a host for same-domain comparison
///
/// Strips a leading literal `www.` prefix, then lowercases. The prefix check
/// is case-sensitive; hosts coming out of [`host_of`] are already lowercase,
/// so this only matters for caller-supplied target domains.
///
/// # Examples
///
/// ```
/// use shopmap::url::normalize_host;
///
/// assert_eq!(normalize_host("www.example.com"), "example.com");
/// assert_eq!(normalize_host("Example.COM"), "example.com");
/// assert_eq!(normalize_host("wwwexample.com"), "wwwexample.com");
/// ```
pub fn normalize_host(host: &str) -> String {
    let stripped = host.strip_prefix("www.").unwrap_or(host);
    stripped.to_ascii_lowercase()
}

/// Decides whether a URL belongs to the target domain
///
/// A URL is in scope when its normalized host equals the normalized target.
/// A URL whose host cannot be parsed is treated as off-domain, never as an
/// error.
///
/// # Arguments
///
/// * `url` - The candidate URL
/// * `target_domain` - The host the session is scoped to
///
/// # Examples
///
/// ```
/// use shopmap::url::same_domain;
///
/// assert!(same_domain("https://www.example.com/x", "example.com"));
/// assert!(!same_domain("https://other.com/x", "example.com"));
/// ```
pub fn same_domain(url: &str, target_domain: &str) -> bool {
    match host_of(url) {
        Ok(host) => normalize_host(&host) == normalize_host(target_domain),
        Err(_) => false,
    }
}

/// Returns true when the URL uses a followable scheme (http or https)
pub fn is_valid_scheme(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
