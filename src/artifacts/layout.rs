use crate::url::site_folder_name;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name for the persisted site map
pub const SITE_MAP_FILE: &str = "sitemap.json";

/// File name for the markdown run summary
pub const SUMMARY_FILE: &str = "crawl_summary.md";

/// Paths the core asks the capture session to write for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub screenshot: PathBuf,
    pub text: PathBuf,
}

/// Directory layout for one crawled site
///
/// ```text
/// <base-dir>/<example_com>/
///     screens_<width>/   full-page screenshots (.png)
///     texts_<width>/     page text (.md)
///     sitemap.json
///     crawl_summary.md
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    site_dir: PathBuf,
    screenshot_dir: PathBuf,
    text_dir: PathBuf,
}

impl ArtifactLayout {
    pub fn new(base_dir: &Path, host: &str, viewport_width: u32) -> Self {
        let site_dir = base_dir.join(site_folder_name(host));
        Self {
            screenshot_dir: site_dir.join(format!("screens_{}", viewport_width)),
            text_dir: site_dir.join(format!("texts_{}", viewport_width)),
            site_dir,
        }
    }

    /// Creates every directory of the layout
    pub fn prepare(&self) -> io::Result<()> {
        fs::create_dir_all(&self.screenshot_dir)?;
        fs::create_dir_all(&self.text_dir)?;
        Ok(())
    }

    pub fn paths_for(&self, url: &str) -> ArtifactPaths {
        let stem = artifact_stem(url);
        ArtifactPaths {
            screenshot: self.screenshot_dir.join(format!("{}.png", stem)),
            text: self.text_dir.join(format!("{}.md", stem)),
        }
    }

    pub fn site_dir(&self) -> &Path {
        &self.site_dir
    }

    pub fn screenshot_dir(&self) -> &Path {
        &self.screenshot_dir
    }

    pub fn text_dir(&self) -> &Path {
        &self.text_dir
    }

    pub fn site_map_path(&self) -> PathBuf {
        self.site_dir.join(SITE_MAP_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.site_dir.join(SUMMARY_FILE)
    }
}

/// Flattens a URL into a file stem
///
/// The scheme prefix is dropped and every `/` becomes `_`, so
/// `https://example.com/docs/intro` becomes `example.com_docs_intro`.
pub fn artifact_stem(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme.replace('/', "_")
}
