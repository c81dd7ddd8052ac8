//! Per-page artifact handling
//!
//! - `ArtifactLayout`: where screenshots, text files and the site map live
//! - `deduplicate`: post-crawl removal of byte-identical text artifacts

mod dedup;
mod layout;

pub use dedup::{content_checksum, deduplicate, DedupReport};
pub use layout::{artifact_stem, ArtifactLayout, ArtifactPaths};
