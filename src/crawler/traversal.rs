//! Depth-first traversal engine
//!
//! Pages are visited in the order a recursive pre-order descent would
//! visit them: a page's links are explored one subtree at a time, in
//! sorted order, before the next sibling is considered. The engine keeps
//! that order with an explicit stack instead of recursion.
//!
//! A URL reachable along several paths is recorded by whichever path the
//! descent reaches first, which is not necessarily the shortest one.

use crate::artifacts::ArtifactLayout;
use crate::crawler::adapter::FetchAdapter;
use crate::crawler::retry::RetryPolicy;
use crate::state::{CrawlState, PageRecord, PageState};
use crate::url::{CrawlScope, Rejection};
use crate::Result;

/// Walks a site through a fetch adapter and records what it finds
pub struct Traversal<'a> {
    adapter: &'a dyn FetchAdapter,
    retry: RetryPolicy,
    layout: &'a ArtifactLayout,
}

impl<'a> Traversal<'a> {
    pub fn new(
        adapter: &'a dyn FetchAdapter,
        retry: RetryPolicy,
        layout: &'a ArtifactLayout,
    ) -> Self {
        Self {
            adapter,
            retry,
            layout,
        }
    }

    /// Crawls from `seed` at depth 0, writing into `state`
    ///
    /// Fetch failures never abort the traversal; the only error is an
    /// internal state machine violation.
    pub async fn crawl(
        &self,
        seed: &str,
        scope: &CrawlScope,
        state: &mut CrawlState,
    ) -> Result<()> {
        tracing::info!(
            "Traversing from {} (max depth {}, domain {})",
            seed,
            scope.max_depth,
            scope.base_domain
        );

        let mut pending = vec![(seed.to_string(), 0u32)];
        while let Some((url, depth)) = pending.pop() {
            let children = self.visit(&url, depth, scope, state).await?;
            // Reversed so the lexicographically first link is popped next
            pending.extend(children.into_iter().rev().map(|link| (link, depth + 1)));
        }

        Ok(())
    }

    /// Processes one URL and returns the links to descend into
    async fn visit(
        &self,
        url: &str,
        depth: u32,
        scope: &CrawlScope,
        state: &mut CrawlState,
    ) -> Result<Vec<String>> {
        let page = PageState::Unvisited;

        let admission = if depth > scope.max_depth {
            Err(Rejection::DepthExceeded)
        } else {
            scope.check(url, &state.visited)
        };
        if let Err(rejection) = admission {
            page.advance(PageState::Rejected, url)?;
            state.stats.record_rejection(rejection);
            tracing::debug!("Skipping {} at depth {}: {:?}", url, depth, rejection);
            return Ok(Vec::new());
        }

        let page = page.advance(PageState::Admitted, url)?;
        state.visited.insert(url);

        let paths = self.layout.paths_for(url);
        let capture = match self.adapter.capture(url, &paths).await {
            Ok(capture) => capture,
            Err(e) => {
                page.advance(PageState::Failed, url)?;
                state.stats.capture_failures += 1;
                tracing::warn!("Capture of {} failed, skipping its links: {}", url, e);
                return Ok(Vec::new());
            }
        };
        let page = page.advance(PageState::Captured, url)?;
        if capture.degraded {
            state.stats.degraded_captures += 1;
        }

        let verification = self.retry.run(url, || self.adapter.verify(url)).await;
        if verification.is_none() {
            state.stats.degraded_verifications += 1;
        }

        let mut links = capture.links;
        links.sort();
        links.dedup();
        let children: Vec<String> = links
            .iter()
            .filter(|link| !state.visited.contains(link))
            .cloned()
            .collect();

        let record = PageRecord {
            url: url.to_string(),
            load_time_ms: capture.load_time_ms,
            http_status_code: verification.map(|v| v.status_code),
            content_size_mb: verification.map(|v| v.size_mb()),
            screenshot_path: paths.screenshot,
            text_file_path: paths.text,
            viewport_width: capture.width,
            viewport_height: capture.height,
            links,
        };
        if state.site_map.insert(record) {
            state.stats.pages_recorded += 1;
        }
        page.advance(PageState::Recorded, url)?;

        tracing::info!(
            "Recorded {} (depth {}, {} new links)",
            url,
            depth,
            children.len()
        );

        Ok(children)
    }
}
