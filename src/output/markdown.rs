//! Markdown run summary
//!
//! Written next to `sitemap.json` at the end of a run: when it ran, what it
//! was scoped to, and what the counters in `CrawlStatistics` ended up as.

use crate::artifacts::DedupReport;
use crate::output::stats::CrawlStatistics;
use crate::url::Rejection;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Everything the summary reports about one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: String,
    pub base_domain: String,
    pub max_depth: u32,
    pub exclude_translations: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: Option<String>,
    pub site_map_path: PathBuf,
    pub pages: usize,
    pub stats: CrawlStatistics,
    pub dedup: Option<DedupReport>,
}

impl RunSummary {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Writes the markdown summary to `output_path`
pub fn generate_markdown_summary(summary: &RunSummary, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let mut md = String::new();
    let stats = &summary.stats;

    md.push_str("# Site-Cartographer Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", summary.seed));
    md.push_str(&format!("- **Base Domain**: {}\n", summary.base_domain));
    md.push_str(&format!("- **Max Depth**: {}\n", summary.max_depth));
    md.push_str(&format!(
        "- **Translations Excluded**: {}\n",
        if summary.exclude_translations { "yes" } else { "no" }
    ));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        summary.duration_seconds()
    ));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push_str(&format!(
        "- **Site Map**: {}\n\n",
        summary.site_map_path.display()
    ));

    md.push_str("## Pages\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| In site map | {} |\n", summary.pages));
    md.push_str(&format!("| Recorded this run | {} |\n", stats.pages_recorded));
    md.push_str(&format!(
        "| Recorded without status/size | {} |\n",
        stats.degraded_verifications
    ));
    md.push_str(&format!(
        "| Degraded captures | {} |\n",
        stats.degraded_captures
    ));
    md.push_str(&format!(
        "| Capture failures | {} |\n\n",
        stats.capture_failures
    ));

    md.push_str("## Rejected URLs\n\n");
    md.push_str("| Reason | Count |\n");
    md.push_str("|--------|-------|\n");
    for (label, reason) in [
        ("Depth exceeded", Rejection::DepthExceeded),
        ("Already visited", Rejection::AlreadyVisited),
        ("Out of scope", Rejection::OutOfScope),
        ("Translation", Rejection::Translation),
    ] {
        md.push_str(&format!("| {} | {} |\n", label, stats.rejected(reason)));
    }
    md.push('\n');

    md.push_str("## Sitemap Merge\n\n");
    md.push_str(&format!(
        "- **Documents Fetched**: {}\n",
        stats.sitemap_documents
    ));
    md.push_str(&format!(
        "- **Documents Abandoned**: {}\n",
        stats.failed_sitemaps
    ));
    md.push_str(&format!("- **URLs Listed**: {}\n", stats.sitemap_urls));
    md.push_str(&format!(
        "- **Pages Added**: {}\n\n",
        stats.sitemap_pages_added
    ));

    if let Some(dedup) = &summary.dedup {
        md.push_str("## Artifact Deduplication\n\n");
        md.push_str(&format!("- **Files Scanned**: {}\n", dedup.files_scanned));
        md.push_str(&format!("- **Files Removed**: {}\n", dedup.removed.len()));
        md.push_str(&format!("- **Bytes Freed**: {}\n", dedup.bytes_freed));
        if !dedup.removed.is_empty() {
            md.push('\n');
            for path in &dedup.removed {
                md.push_str(&format!("- `{}`\n", path.display()));
            }
        }
        md.push('\n');
    }

    md
}
