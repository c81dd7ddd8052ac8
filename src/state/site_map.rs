//! Site map and visited-set types shared across a crawl run

use crate::output::CrawlStatistics;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// Metadata recorded for one crawled URL
///
/// Serialized with the field names of the persisted `sitemap.json`. The URL
/// itself is the map key and is not repeated inside the object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    #[serde(skip)]
    pub url: String,

    /// Wall-clock time of the page-load phase
    #[serde(rename = "page_load_time_ms")]
    pub load_time_ms: u64,

    /// `None` only when every verification attempt failed
    pub http_status_code: Option<u16>,

    /// Payload size in MiB; `None` under the same condition as the status
    #[serde(rename = "content_size_mb")]
    pub content_size_mb: Option<f64>,

    pub screenshot_path: PathBuf,

    pub text_file_path: PathBuf,

    #[serde(rename = "full_width")]
    pub viewport_width: u32,

    #[serde(rename = "full_height")]
    pub viewport_height: u32,

    /// Sorted, deduplicated absolute HTTP(S) link targets
    pub links: Vec<String>,
}

/// Mapping from URL to its record; grows monotonically during a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteMap {
    pages: BTreeMap<String, PageRecord>,
}

impl SiteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record keyed by its URL
    ///
    /// An existing record is never replaced; returns false in that case.
    pub fn insert(&mut self, record: PageRecord) -> bool {
        if self.pages.contains_key(&record.url) {
            return false;
        }
        self.pages.insert(record.url.clone(), record);
        true
    }

    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        self.pages.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// URLs in sorted order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &PageRecord> {
        self.pages.values()
    }

    /// Restores the `url` field of every record from its key
    ///
    /// Needed after deserializing, since the URL is only stored as the key.
    pub fn restore_urls(&mut self) {
        for (url, record) in self.pages.iter_mut() {
            record.url.clone_from(url);
        }
    }
}

/// URLs already processed or being processed in this run
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Marks a URL visited; returns false if it already was
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl From<&SiteMap> for VisitedSet {
    fn from(site_map: &SiteMap) -> Self {
        Self {
            urls: site_map.urls().map(str::to_string).collect(),
        }
    }
}

/// Mutable state owned by one crawl invocation
///
/// Threaded by `&mut` through the primary traversal and every sitemap
/// merge pass, so each URL is fetched at most once per run.
#[derive(Debug, Default)]
pub struct CrawlState {
    pub site_map: SiteMap,
    pub visited: VisitedSet,
    pub stats: CrawlStatistics,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every site map key is also visited
    pub fn is_consistent(&self) -> bool {
        self.site_map.urls().all(|url| self.visited.contains(url))
    }
}
