/// Checks whether a host belongs to a base domain
///
/// A host matches when it is exactly the base domain or a proper subdomain
/// of it. Subdomain matching happens on a dot boundary, so
/// `notexample.com` is not inside `example.com`.
///
/// Both arguments are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use site_cartographer::url::host_in_domain;
///
/// assert!(host_in_domain("example.com", "example.com"));
/// assert!(host_in_domain("example.com", "blog.example.com"));
/// assert!(host_in_domain("example.com", "api.v2.example.com"));
/// assert!(!host_in_domain("example.com", "notexample.com"));
/// assert!(!host_in_domain("blog.example.com", "example.com"));
/// ```
pub fn host_in_domain(base_domain: &str, host: &str) -> bool {
    if base_domain.is_empty() {
        return false;
    }

    match host.strip_suffix(base_domain) {
        Some("") => true,
        Some(prefix) => prefix.len() > 1 && prefix.ends_with('.'),
        None => false,
    }
}
