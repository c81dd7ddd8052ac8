use serde::Deserialize;

/// Main configuration structure for Site-Cartographer
///
/// Every section and key is optional in the TOML file; missing values fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub retry: RetryConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Traversal behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum link depth to follow from the seed URL
    pub max_depth: u32,

    /// Skip URLs whose path contains a language/locale segment
    pub exclude_translations: bool,

    /// Viewport width requested from the capture session (pixels)
    pub viewport_width: u32,

    /// Viewport height requested from the capture session (pixels)
    pub viewport_height: u32,

    /// Run the sitemap merge pass after the primary traversal
    pub sitemap: bool,

    /// Location of the sitemap document relative to the site root
    pub sitemap_path: String,

    /// Run the artifact deduplicator after all traversal passes
    pub dedup: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            exclude_translations: false,
            viewport_width: 1366,
            viewport_height: 1080,
            sitemap: true,
            sitemap_path: "/sitemap.xml".to_string(),
            dedup: true,
        }
    }
}

/// Retry policy for verification requests
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// One backoff time unit (milliseconds); attempt `n` waits `base * 2^n`
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

/// HTTP client configuration shared by capture, verify and sitemap requests
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// User-Agent header value
    pub user_agent: String,

    /// Upper bound for loading a single page (seconds)
    pub page_load_timeout_secs: u64,

    /// Upper bound for establishing a connection (seconds)
    pub connect_timeout_secs: u64,

    /// `name=value` cookies sent with every request
    pub cookies: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3"
                .to_string(),
            page_load_timeout_secs: 30,
            connect_timeout_secs: 10,
            cookies: Vec::new(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory under which one folder per crawled site is created
    pub base_dir: String,

    /// Write a markdown run summary next to the site map
    pub summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: "scrape".to_string(),
            summary: true,
        }
    }
}
