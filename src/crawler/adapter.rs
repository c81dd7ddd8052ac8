//! Fetch adapter contract
//!
//! The traversal engine never talks to a browser or an HTTP client
//! directly. It goes through these traits, which keeps the engine
//! deterministic under test and lets a rendering backend replace the
//! bundled HTTP one.

use crate::artifacts::ArtifactPaths;
use crate::FetchError;
use async_trait::async_trait;

/// What a capture session reports for one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureResult {
    /// Outbound absolute HTTP(S) links, in any order (the engine sorts them)
    pub links: Vec<String>,

    /// Wall-clock duration of the page-load phase
    pub load_time_ms: u64,

    /// Rendered content width
    pub width: u32,

    /// Rendered content height
    pub height: u32,

    /// The page-load bound was hit or part of the page could not be read;
    /// the other fields describe whatever state was available
    pub degraded: bool,
}

/// Lightweight status/size check, independent of the capture session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verification {
    pub status_code: u16,
    pub size_bytes: u64,
}

impl Verification {
    /// Payload size in MiB
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Visits pages on behalf of the traversal engine
#[async_trait]
pub trait FetchAdapter: Send + Sync {
    /// Renders `url`, writes its artifacts to `paths`, and reports its links
    ///
    /// Must return within the adapter's page-load bound. A `Fatal` error
    /// means navigation itself failed; slow or partially loaded pages are
    /// returned as `Ok` with `degraded` set.
    async fn capture(&self, url: &str, paths: &ArtifactPaths) -> Result<CaptureResult, FetchError>;

    /// Fetches `url` without rendering to learn its status and size
    ///
    /// Connection errors and timeouts must be reported as `Transient`.
    async fn verify(&self, url: &str) -> Result<Verification, FetchError>;
}

/// Retrieves sitemap XML documents
#[async_trait]
pub trait SitemapSource: Send + Sync {
    /// Returns the document body, or `None` when the server has no such
    /// document (any non-success status)
    async fn fetch_sitemap(&self, url: &str) -> Result<Option<String>, FetchError>;
}
