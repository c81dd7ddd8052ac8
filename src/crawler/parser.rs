//! HTML parser for extracting links and page text
//!
//! This module handles parsing fetched HTML to extract:
//! - Outbound links (absolute HTTP(S) targets of `<a href>`)
//! - A markdown-flavoured text rendition of the page body

use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPage {
    /// Sorted, deduplicated absolute links
    pub links: Vec<String>,

    /// Page text, one block per line, headings prefixed with `#`
    pub text: String,
}

/// Parses HTML content and extracts links and text
///
/// # Link Extraction Rules
///
/// **Include:**
/// - every `<a href="...">`, resolved against `base_url`
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:`, `data:` and other non-HTTP(S) targets
/// - fragment-only links to the same page (`#section`)
/// - hrefs that cannot be resolved to a URL
///
/// # Example
///
/// ```
/// use site_cartographer::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><body><h1>Hi</h1><a href="/b">B</a><a href="/a">A</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.links, vec!["https://example.com/a", "https://example.com/b"]);
/// assert_eq!(parsed.text, "# Hi");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        links: extract_links(&document, base_url),
        text: extract_text(&document),
    }
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = BTreeSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.insert(absolute_url);
                }
            }
        }
    }

    links.into_iter().collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}

/// Renders the text of the page body as markdown-like lines
///
/// Everything before the first heading is dropped (navigation, cookie
/// banners); pages without headings keep all of their text.
fn extract_text(document: &Html) -> String {
    let Ok(block_selector) = Selector::parse("h1, h2, h3, h4, h5, h6, p, li, pre, blockquote, td")
    else {
        return String::new();
    };

    let lines: Vec<String> = document
        .select(&block_selector)
        .filter_map(render_block)
        .collect();

    let first_heading = lines
        .iter()
        .position(|line| line.starts_with('#'))
        .unwrap_or(0);

    lines[first_heading..].join("\n")
}

fn render_block(element: ElementRef<'_>) -> Option<String> {
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        return None;
    }

    let name = element.value().name();
    let rendered = match name.strip_prefix('h').and_then(|n| n.parse::<usize>().ok()) {
        Some(level) => format!("{} {}", "#".repeat(level), text),
        None if name == "li" => format!("- {}", text),
        None if name == "blockquote" => format!("> {}", text),
        None => text,
    };
    Some(rendered)
}
