//! Site map JSON persistence
//!
//! The document is an object keyed by URL, pretty-printed with four-space
//! indentation. Keys come out sorted because `SiteMap` is ordered.

use crate::state::SiteMap;
use crate::CrawlError;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::Path;

/// Renders the site map as an indented JSON document
pub fn site_map_to_json(site_map: &SiteMap) -> Result<String, CrawlError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    site_map.serialize(&mut serializer)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes the site map to `path`, replacing any previous checkpoint
pub fn write_site_map(site_map: &SiteMap, path: &Path) -> Result<(), CrawlError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, site_map_to_json(site_map)?)?;
    tracing::info!(
        "Wrote site map with {} pages to {}",
        site_map.len(),
        path.display()
    );
    Ok(())
}

/// Reads a site map previously written by `write_site_map`
pub fn read_site_map(path: &Path) -> Result<SiteMap, CrawlError> {
    let content = fs::read_to_string(path)?;
    let mut site_map: SiteMap = serde_json::from_str(&content)?;
    site_map.restore_urls();
    Ok(site_map)
}
