//! Run statistics accumulated during a crawl
//!
//! The traversal engine and sitemap merger update these counters as they
//! go; nothing here is persisted beyond the run summary.

use crate::url::Rejection;
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Pages inserted into the site map
    pub pages_recorded: u64,

    /// URLs turned away before any fetch, by reason
    pub rejections: HashMap<Rejection, u64>,

    /// Captures that failed with a fatal navigation error
    pub capture_failures: u64,

    /// Captures that completed with partial state
    pub degraded_captures: u64,

    /// Pages recorded with null status/size after verification gave up
    pub degraded_verifications: u64,

    /// Sitemap documents fetched successfully
    pub sitemap_documents: u64,

    /// Sitemap documents abandoned (unreachable or malformed)
    pub failed_sitemaps: u64,

    /// Distinct page URLs listed by the sitemap tree
    pub sitemap_urls: u64,

    /// Pages the merge pass added to the site map
    pub sitemap_pages_added: u64,
}

impl CrawlStatistics {
    pub fn record_rejection(&mut self, rejection: Rejection) {
        *self.rejections.entry(rejection).or_insert(0) += 1;
    }

    pub fn rejected(&self, rejection: Rejection) -> u64 {
        self.rejections.get(&rejection).copied().unwrap_or(0)
    }

    pub fn total_rejections(&self) -> u64 {
        self.rejections.values().sum()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Pages:");
    println!("  Recorded: {}", stats.pages_recorded);
    println!("  Capture failures: {}", stats.capture_failures);
    println!("  Degraded captures: {}", stats.degraded_captures);
    println!(
        "  Recorded without status/size: {}",
        stats.degraded_verifications
    );
    println!();

    if stats.total_rejections() > 0 {
        println!("Rejected URLs:");
        let mut counts: Vec<_> = stats.rejections.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1));
        for (reason, count) in counts {
            println!("  {:?}: {}", reason, count);
        }
        println!();
    }

    println!("Sitemap:");
    println!("  Documents fetched: {}", stats.sitemap_documents);
    println!("  Documents abandoned: {}", stats.failed_sitemaps);
    println!("  URLs listed: {}", stats.sitemap_urls);
    println!("  Pages added: {}", stats.sitemap_pages_added);
}
