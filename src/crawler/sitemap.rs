//! Sitemap merge pass
//!
//! After the primary traversal, the site's own sitemap is read to find
//! pages that link-following missed. Sitemap indexes are resolved
//! depth-first in document order; every page URL that is not visited yet
//! gets a shallow traversal (the page plus its direct links) into the same
//! crawl state.
//!
//! Supported document shapes:
//!
//! ```text
//! <sitemapindex>                <urlset>
//!   <sitemap><loc>..</loc>        <url><loc>..</loc></url>
//! </sitemapindex>               </urlset>
//! ```
//!
//! Element names are matched without their namespace prefix.

use crate::crawler::adapter::SitemapSource;
use crate::crawler::traversal::Traversal;
use crate::output::CrawlStatistics;
use crate::state::CrawlState;
use crate::url::{CrawlScope, Rejection};
use crate::{Result, SitemapError};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use url::Url;

/// Depth bound for the pages discovered through a sitemap
pub const SITEMAP_PASS_DEPTH: u32 = 1;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: locations of further sitemap documents
    Index(Vec<String>),
    /// `<urlset>`: page locations
    UrlSet(Vec<String>),
}

/// Resolves the sitemap location against the root of the seed's site
pub fn sitemap_location(seed: &str, sitemap_path: &str) -> Result<String> {
    Ok(Url::parse(seed)?.join(sitemap_path)?.to_string())
}

/// Parses one sitemap document fetched from `url`
///
/// Relative `<loc>` values are resolved against `url`. A document whose
/// root is neither `sitemapindex` nor `urlset`, or that is not well-formed
/// XML, is `Malformed`.
pub fn parse_sitemap(url: &str, xml: &str) -> std::result::Result<SitemapDocument, SitemapError> {
    let malformed = |message: String| SitemapError::Malformed {
        url: url.to_string(),
        message,
    };
    let base = Url::parse(url).ok();

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut root: Option<String> = None;
    let mut open: Vec<String> = Vec::new();
    let mut loc = String::new();
    let mut locations = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if root.is_none() {
                    root = Some(name.clone());
                }
                if name == "loc" {
                    loc.clear();
                }
                open.push(name);
            }
            Ok(Event::Empty(ref e)) => {
                if root.is_none() {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    root = Some(name);
                }
            }
            Ok(Event::Text(ref e)) => {
                if open.last().map(String::as_str) == Some("loc") {
                    let text = e
                        .unescape()
                        .map_err(|err| malformed(err.to_string()))?;
                    loc.push_str(text.trim());
                }
            }
            Ok(Event::CData(ref e)) => {
                if open.last().map(String::as_str) == Some("loc") {
                    loc.push_str(String::from_utf8_lossy(e).trim());
                }
            }
            Ok(Event::End(_)) => {
                let closed = open.pop();
                let parent = open.last().map(String::as_str);
                if closed.as_deref() == Some("loc")
                    && matches!(parent, Some("sitemap") | Some("url"))
                    && !loc.is_empty()
                {
                    locations.push(resolve_loc(base.as_ref(), &loc));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(malformed(format!(
                    "{} at byte {}",
                    e,
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if !open.is_empty() {
        return Err(malformed("unexpected end of document".to_string()));
    }

    match root.as_deref() {
        Some("sitemapindex") => Ok(SitemapDocument::Index(locations)),
        Some("urlset") => Ok(SitemapDocument::UrlSet(locations)),
        Some(other) => Err(malformed(format!("unexpected root element <{}>", other))),
        None => Err(malformed("no root element".to_string())),
    }
}

fn resolve_loc(base: Option<&Url>, loc: &str) -> String {
    base.and_then(|base| base.join(loc).ok())
        .map(|resolved| resolved.to_string())
        .unwrap_or_else(|| loc.to_string())
}

/// Resolves the sitemap tree rooted at `root_url` into its page URLs
///
/// Child sitemaps are followed depth-first in document order. Each sitemap
/// URL is fetched at most once, so cyclic or repeated index entries are
/// harmless. A missing, unreachable or malformed document abandons only its
/// own branch. Page URLs are returned deduplicated in first-seen order.
pub async fn collect_sitemap_urls(
    source: &dyn SitemapSource,
    root_url: &str,
    stats: &mut CrawlStatistics,
) -> Vec<String> {
    let mut pending = vec![root_url.to_string()];
    let mut fetched: HashSet<String> = HashSet::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut pages = Vec::new();

    while let Some(sitemap_url) = pending.pop() {
        if !fetched.insert(sitemap_url.clone()) {
            tracing::debug!("Sitemap {} already processed", sitemap_url);
            continue;
        }

        let body = match source.fetch_sitemap(&sitemap_url).await {
            Ok(Some(body)) => body,
            Ok(None) => {
                stats.failed_sitemaps += 1;
                continue;
            }
            Err(e) => {
                tracing::warn!("Abandoning sitemap {}: {}", sitemap_url, e);
                stats.failed_sitemaps += 1;
                continue;
            }
        };

        match parse_sitemap(&sitemap_url, &body) {
            Ok(SitemapDocument::Index(children)) => {
                stats.sitemap_documents += 1;
                tracing::debug!("Sitemap index {} lists {} sitemaps", sitemap_url, children.len());
                pending.extend(children.into_iter().rev());
            }
            Ok(SitemapDocument::UrlSet(urls)) => {
                stats.sitemap_documents += 1;
                tracing::debug!("Sitemap {} lists {} URLs", sitemap_url, urls.len());
                for url in urls {
                    if seen.insert(url.clone()) {
                        pages.push(url);
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Abandoning sitemap branch: {}", e);
                stats.failed_sitemaps += 1;
            }
        }
    }

    stats.sitemap_urls = pages.len() as u64;
    pages
}

/// Merges pages listed by the sitemap at `sitemap_url` into `state`
///
/// Every listed URL that is still unvisited and within `scope` (ignoring its
/// depth) is traversed with a depth bound of 1. The site map only grows.
pub async fn merge_sitemap(
    source: &dyn SitemapSource,
    traversal: &Traversal<'_>,
    sitemap_url: &str,
    scope: &CrawlScope,
    state: &mut CrawlState,
) -> Result<()> {
    let urls = collect_sitemap_urls(source, sitemap_url, &mut state.stats).await;
    tracing::info!("Sitemap {} lists {} page URLs", sitemap_url, urls.len());

    let shallow = scope.with_max_depth(SITEMAP_PASS_DEPTH);
    let before = state.site_map.len();

    for url in &urls {
        match shallow.check(url, &state.visited) {
            Ok(()) => traversal.crawl(url, &shallow, state).await?,
            Err(Rejection::AlreadyVisited) => {}
            Err(rejection) => {
                tracing::debug!("Skipping sitemap URL {}: {:?}", url, rejection);
                state.stats.record_rejection(rejection);
            }
        }
    }

    let added = state.site_map.len().saturating_sub(before);
    state.stats.sitemap_pages_added += added as u64;
    tracing::info!("Sitemap merge added {} pages", added);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArtifactLayout;
    use crate::crawler::retry::RetryPolicy;
    use crate::crawler::test_support::FakeSite;
    use std::path::Path;
    use std::time::Duration;

    const ROOT: &str = "https://example.com/sitemap.xml";

    fn urlset(urls: &[&str]) -> String {
        let entries: String = urls
            .iter()
            .map(|u| format!("<url><loc>{}</loc></url>", u))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
            entries
        )
    }

    fn index(sitemaps: &[&str]) -> String {
        let entries: String = sitemaps
            .iter()
            .map(|u| {
                format!(
                    "<sitemap><loc>{}</loc><lastmod>2024-01-01</lastmod></sitemap>",
                    u
                )
            })
            .collect();
        format!(
            r#"<sitemapindex xmlns="{}">{}</sitemapindex>"#,
            "http://www.sitemaps.org/schemas/sitemap/0.9", entries
        )
    }

    #[test]
    fn test_sitemap_location_is_site_root() {
        assert_eq!(
            sitemap_location("https://example.com/docs/intro", "/sitemap.xml").unwrap(),
            "https://example.com/sitemap.xml"
        );
    }

    #[test]
    fn test_parse_urlset() {
        let xml = urlset(&["https://example.com/a", "https://example.com/b?x=1&amp;y=2"]);
        assert_eq!(
            parse_sitemap(ROOT, &xml).unwrap(),
            SitemapDocument::UrlSet(vec![
                "https://example.com/a".to_string(),
                "https://example.com/b?x=1&y=2".to_string(),
            ])
        );
    }

    #[test]
    fn test_parse_index_with_prefixed_namespace() {
        let xml = r#"<sm:sitemapindex xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
            <sm:sitemap><sm:loc> https://example.com/posts.xml </sm:loc></sm:sitemap>
        </sm:sitemapindex>"#;
        assert_eq!(
            parse_sitemap(ROOT, xml).unwrap(),
            SitemapDocument::Index(vec!["https://example.com/posts.xml".to_string()])
        );
    }

    #[test]
    fn test_parse_cdata_and_relative_loc() {
        let xml = "<urlset><url><loc><![CDATA[/relative]]></loc></url></urlset>";
        assert_eq!(
            parse_sitemap(ROOT, xml).unwrap(),
            SitemapDocument::UrlSet(vec!["https://example.com/relative".to_string()])
        );
    }

    #[test]
    fn test_parse_rejects_unknown_root() {
        let result = parse_sitemap(ROOT, "<html><body>Not found</body></html>");
        assert!(matches!(result, Err(SitemapError::Malformed { .. })));
    }

    #[test]
    fn test_parse_rejects_broken_xml() {
        let result = parse_sitemap(ROOT, "<urlset><url><loc>https://example.com/</url></urlset>");
        assert!(matches!(result, Err(SitemapError::Malformed { .. })));

        let result = parse_sitemap(ROOT, "<urlset><url><loc>https://example.com/</loc>");
        assert!(matches!(result, Err(SitemapError::Malformed { .. })));

        assert!(parse_sitemap(ROOT, "").is_err());
    }

    #[tokio::test]
    async fn test_index_resolved_in_document_order() {
        let site = FakeSite::new()
            .sitemap(
                ROOT,
                &index(&[
                    "https://example.com/one.xml",
                    "https://example.com/two.xml",
                ]),
            )
            .sitemap(
                "https://example.com/one.xml",
                &urlset(&["https://example.com/b", "https://example.com/a"]),
            )
            .sitemap(
                "https://example.com/two.xml",
                &urlset(&["https://example.com/a", "https://example.com/c"]),
            );
        let mut stats = CrawlStatistics::default();

        let urls = collect_sitemap_urls(&site, ROOT, &mut stats).await;

        assert_eq!(
            urls,
            vec![
                "https://example.com/b",
                "https://example.com/a",
                "https://example.com/c",
            ]
        );
        assert_eq!(stats.sitemap_documents, 3);
        assert_eq!(stats.sitemap_urls, 3);
    }

    #[tokio::test]
    async fn test_cyclic_index_terminates() {
        let site = FakeSite::new()
            .sitemap(ROOT, &index(&["https://example.com/child.xml"]))
            .sitemap(
                "https://example.com/child.xml",
                &index(&[ROOT, "https://example.com/child.xml"]),
            );
        let mut stats = CrawlStatistics::default();

        let urls = collect_sitemap_urls(&site, ROOT, &mut stats).await;

        assert!(urls.is_empty());
        assert_eq!(site.sitemap_fetches().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_branch_is_isolated() {
        let site = FakeSite::new()
            .sitemap(
                ROOT,
                &index(&[
                    "https://example.com/broken.xml",
                    "https://example.com/missing.xml",
                    "https://example.com/good.xml",
                ]),
            )
            .sitemap("https://example.com/broken.xml", "<urlset><url>")
            .sitemap(
                "https://example.com/good.xml",
                &urlset(&["https://example.com/found"]),
            );
        let mut stats = CrawlStatistics::default();

        let urls = collect_sitemap_urls(&site, ROOT, &mut stats).await;

        assert_eq!(urls, vec!["https://example.com/found"]);
        assert_eq!(stats.failed_sitemaps, 2);
    }

    #[tokio::test]
    async fn test_unreachable_sitemap_yields_nothing() {
        let site = FakeSite::new().unreachable_sitemap(ROOT);
        let mut stats = CrawlStatistics::default();

        assert!(collect_sitemap_urls(&site, ROOT, &mut stats).await.is_empty());
        assert_eq!(stats.failed_sitemaps, 1);
    }

    #[tokio::test]
    async fn test_merge_is_a_superset_with_shallow_records() {
        let site = FakeSite::new()
            .page("https://example.com/", &["https://example.com/a"])
            .page("https://example.com/a", &[])
            .page(
                "https://example.com/orphan",
                &["https://example.com/orphan/child"],
            )
            .page(
                "https://example.com/orphan/child",
                &["https://example.com/orphan/grandchild"],
            )
            .page("https://example.com/orphan/grandchild", &[])
            .page("https://example.com/de/seite", &[])
            .sitemap(
                ROOT,
                &urlset(&[
                    "https://example.com/a",
                    "https://example.com/orphan",
                    "https://example.com/de/seite",
                    "https://elsewhere.com/",
                ]),
            );

        let layout = ArtifactLayout::new(Path::new("scrape"), "example.com", 1366);
        let traversal = Traversal::new(&site, RetryPolicy::new(1, Duration::ZERO), &layout);
        let scope = CrawlScope::new("example.com", 2, true);
        let mut state = CrawlState::new();

        traversal
            .crawl("https://example.com/", &scope, &mut state)
            .await
            .unwrap();
        let primary = state.site_map.clone();

        merge_sitemap(&site, &traversal, ROOT, &scope, &mut state)
            .await
            .unwrap();

        for url in primary.urls() {
            assert_eq!(state.site_map.get(url), primary.get(url));
        }
        assert!(state.site_map.contains("https://example.com/orphan"));
        assert!(state.site_map.contains("https://example.com/orphan/child"));
        assert!(!state.site_map.contains("https://example.com/orphan/grandchild"));
        assert!(!state.site_map.contains("https://example.com/de/seite"));
        assert!(!state.site_map.contains("https://elsewhere.com/"));
        assert_eq!(state.stats.sitemap_pages_added, 2);
        assert_eq!(
            site.captured()
                .iter()
                .filter(|u| u.as_str() == "https://example.com/a")
                .count(),
            1
        );
    }
}
