//! URL scope module for Site-Cartographer
//!
//! This module decides which URLs a crawl may fetch: host extraction,
//! domain/subdomain matching, translation path detection, and the
//! `CrawlScope` that combines them into the admission check.

mod domain;
mod locale;
mod matcher;

use crate::state::VisitedSet;
use crate::CrawlError;

// Re-export main functions
pub use domain::{extract_host, site_folder_name};
pub use locale::{is_locale_segment, is_translation_url};
pub use matcher::host_in_domain;

/// Why a URL was not admitted to the traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Discovered deeper than the scope's maximum depth
    DepthExceeded,
    /// Already fetched, or being fetched, in this run
    AlreadyVisited,
    /// Host is neither the base domain nor one of its subdomains
    OutOfScope,
    /// Path contains a language/locale segment and translations are excluded
    Translation,
}

/// Immutable crawl boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    /// Lowercase host every fetched URL must equal or be a subdomain of
    pub base_domain: String,

    /// Deepest link level that is still fetched (the seed is depth 0)
    pub max_depth: u32,

    /// Reject URLs with a locale path segment
    pub exclude_translations: bool,
}

impl CrawlScope {
    pub fn new(base_domain: impl Into<String>, max_depth: u32, exclude_translations: bool) -> Self {
        Self {
            base_domain: base_domain.into().to_lowercase(),
            max_depth,
            exclude_translations,
        }
    }

    /// Builds a scope whose base domain is the seed URL's host
    pub fn from_seed(
        seed: &str,
        max_depth: u32,
        exclude_translations: bool,
    ) -> Result<Self, CrawlError> {
        let host = extract_host(seed).ok_or_else(|| CrawlError::MissingHost(seed.to_string()))?;
        Ok(Self::new(host, max_depth, exclude_translations))
    }

    /// Same boundary with a different depth bound
    pub fn with_max_depth(&self, max_depth: u32) -> Self {
        Self {
            max_depth,
            ..self.clone()
        }
    }

    /// Checks domain and translation policy, ignoring the visited set
    pub fn check_policy(&self, url: &str) -> Result<(), Rejection> {
        let in_domain = extract_host(url)
            .map(|host| host_in_domain(&self.base_domain, &host))
            .unwrap_or(false);
        if !in_domain {
            return Err(Rejection::OutOfScope);
        }

        if self.exclude_translations && is_translation_url(url) {
            return Err(Rejection::Translation);
        }

        Ok(())
    }

    /// Full admission check, reporting the reason for a rejection
    ///
    /// Pure: inserting into `visited` is the caller's job.
    pub fn check(&self, url: &str, visited: &VisitedSet) -> Result<(), Rejection> {
        if visited.contains(url) {
            return Err(Rejection::AlreadyVisited);
        }
        self.check_policy(url)
    }
}

/// Decides whether a URL is eligible for traversal
pub fn admit(url: &str, scope: &CrawlScope, visited: &VisitedSet) -> bool {
    scope.check(url, visited).is_ok()
}
