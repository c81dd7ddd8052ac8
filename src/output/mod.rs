//! Output module for persisting crawl results
//!
//! This module handles:
//! - Writing and reading the `sitemap.json` checkpoint
//! - Accumulating crawl statistics
//! - Generating the markdown run summary

mod json;
mod markdown;
pub mod stats;

pub use json::{read_site_map, site_map_to_json, write_site_map};
pub use markdown::{format_markdown_summary, generate_markdown_summary, RunSummary};
pub use stats::{print_statistics, CrawlStatistics};
