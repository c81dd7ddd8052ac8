use url::Url;

/// Extracts the lowercase host of an absolute HTTP(S) URL
///
/// Returns `None` for unparseable URLs, for schemes other than `http` and
/// `https`, and for URLs without a host. The port is not part of the result.
///
/// # Examples
///
/// ```
/// use site_cartographer::url::extract_host;
///
/// assert_eq!(extract_host("https://Example.COM/path"), Some("example.com".to_string()));
/// assert_eq!(extract_host("http://127.0.0.1:8080/"), Some("127.0.0.1".to_string()));
/// assert_eq!(extract_host("mailto:someone@example.com"), None);
/// ```
pub fn extract_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }
    parsed.host_str().map(|h| h.to_lowercase())
}

/// Folder name used for a site's output directory (`example.com` -> `example_com`)
pub fn site_folder_name(host: &str) -> String {
    host.replace('.', "_")
}
