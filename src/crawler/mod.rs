//! Crawler module for site traversal and sitemap merging
//!
//! This module contains the core crawling logic, including:
//! - The fetch adapter contract and its HTTP implementation
//! - HTML parsing and link extraction
//! - Retry policy for verification requests
//! - Depth-first traversal
//! - Sitemap merge pass
//! - The end-to-end crawl pipeline

mod adapter;
mod fetcher;
mod parser;
mod retry;
mod sitemap;
mod traversal;

pub use adapter::{CaptureResult, FetchAdapter, SitemapSource, Verification};
pub use fetcher::{build_http_client, HttpFetcher};
pub use parser::{parse_html, ParsedPage};
pub use retry::RetryPolicy;
pub use sitemap::{
    collect_sitemap_urls, merge_sitemap, parse_sitemap, sitemap_location, SitemapDocument,
    SITEMAP_PASS_DEPTH,
};
pub use traversal::Traversal;

use crate::artifacts::{deduplicate, ArtifactLayout};
use crate::config::Config;
use crate::output::{generate_markdown_summary, write_site_map, RunSummary};
use crate::state::CrawlState;
use crate::url::CrawlScope;
use crate::Result;
use chrono::Utc;
use std::path::Path;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from the configuration
/// 2. Traverse the site from `seed`
/// 3. Merge pages listed in the site's sitemap
/// 4. Deduplicate text artifacts
/// 5. Write the site map and the run summary
pub async fn crawl(config: &Config, seed: &str, config_hash: Option<String>) -> Result<RunSummary> {
    let fetcher = HttpFetcher::from_config(&config.http, &config.crawler)?;
    run_crawl(&fetcher, &fetcher, config, seed, config_hash).await
}

/// Runs the crawl pipeline against any adapter
///
/// The site map is written after the primary traversal and again after
/// the sitemap merge, so an interrupted merge still leaves a usable file.
pub async fn run_crawl(
    adapter: &dyn FetchAdapter,
    sitemaps: &dyn SitemapSource,
    config: &Config,
    seed: &str,
    config_hash: Option<String>,
) -> Result<RunSummary> {
    let started_at = Utc::now();
    let scope = CrawlScope::from_seed(
        seed,
        config.crawler.max_depth,
        config.crawler.exclude_translations,
    )?;

    let layout = ArtifactLayout::new(
        Path::new(&config.output.base_dir),
        &scope.base_domain,
        config.crawler.viewport_width,
    );
    layout.prepare()?;
    tracing::info!("Writing artifacts under {}", layout.site_dir().display());

    let traversal = Traversal::new(adapter, RetryPolicy::from(&config.retry), &layout);
    let mut state = CrawlState::new();

    traversal.crawl(seed, &scope, &mut state).await?;
    write_site_map(&state.site_map, &layout.site_map_path())?;

    if config.crawler.sitemap {
        let sitemap_url = sitemap_location(seed, &config.crawler.sitemap_path)?;
        merge_sitemap(sitemaps, &traversal, &sitemap_url, &scope, &mut state).await?;
        write_site_map(&state.site_map, &layout.site_map_path())?;
    }

    let dedup = if config.crawler.dedup {
        let text_dir = layout.text_dir().to_path_buf();
        match tokio::task::spawn_blocking(move || deduplicate(&text_dir)).await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(e)) => {
                tracing::warn!("Deduplication failed: {}", e);
                None
            }
            Err(e) => {
                tracing::warn!("Deduplication task failed: {}", e);
                None
            }
        }
    } else {
        None
    };

    let summary = RunSummary {
        seed: seed.to_string(),
        base_domain: scope.base_domain.clone(),
        max_depth: scope.max_depth,
        exclude_translations: scope.exclude_translations,
        started_at,
        finished_at: Utc::now(),
        config_hash,
        site_map_path: layout.site_map_path(),
        pages: state.site_map.len(),
        stats: state.stats.clone(),
        dedup,
    };

    if config.output.summary {
        let summary_path = layout.summary_path();
        match generate_markdown_summary(&summary, &summary_path) {
            Ok(()) => tracing::info!("Wrote run summary to {}", summary_path.display()),
            Err(e) => tracing::warn!("Failed to write run summary: {}", e),
        }
    }

    tracing::info!(
        "Crawl of {} finished: {} pages in {} seconds",
        seed,
        summary.pages,
        summary.duration_seconds()
    );

    Ok(summary)
}
