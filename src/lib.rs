//! Site-Cartographer: a depth-bounded website structure mapper
//!
//! This crate walks a website from a seed URL, records metadata about every
//! in-scope page it reaches, merges URLs declared in the site's sitemap
//! documents into the same map, and finally removes duplicate text artifacts.

pub mod artifacts;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Cartographer operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Seed URL has no host: {0}")]
    MissingHost(String),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("Invalid state transition for {url}: {from:?} -> {to:?}")]
    InvalidTransition {
        url: String,
        from: state::PageState,
        to: state::PageState,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// How a failed fetch should be treated by its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Connection error, dropped connection or timeout; worth retrying
    Transient,
    /// Anything else; retrying will not help
    Fatal,
}

/// A failed capture, verification or sitemap request
#[derive(Debug, Clone, Error)]
#[error("{kind:?} failure for {url}: {message}")]
pub struct FetchError {
    pub url: String,
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn transient(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: FailureKind::Transient,
            message: message.into(),
        }
    }

    pub fn fatal(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: FailureKind::Fatal,
            message: message.into(),
        }
    }

    /// Classifies a reqwest error by its type, not its message
    ///
    /// Connection failures, timeouts and connections dropped mid-request
    /// are transient; everything else (invalid URL, body decoding,
    /// redirect policy, ...) is fatal.
    pub fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        let request_failed = error.is_request()
            && !error.is_builder()
            && !error.is_redirect()
            && !error.is_decode()
            && !error.is_status();

        let transient = error.is_connect()
            || error.is_timeout()
            || request_failed
            || is_connection_drop(error);

        if transient {
            Self::transient(url, error.to_string())
        } else {
            Self::fatal(url, error.to_string())
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind == FailureKind::Transient
    }
}

/// Whether an I/O error somewhere in the source chain means the peer went away
pub(crate) fn is_connection_drop(error: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        current = err.source();
    }
    false
}

/// Sitemap-specific errors
///
/// Either kind abandons only the sitemap branch it occurred in.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Malformed sitemap document at {url}: {message}")]
    Malformed { url: String, message: String },

    #[error("Failed to fetch sitemap: {0}")]
    Fetch(#[from] FetchError),
}

/// Result type alias for Site-Cartographer operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::state::{CrawlState, PageRecord, PageState, SiteMap, VisitedSet};
pub use crate::url::CrawlScope;
