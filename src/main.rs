//! Site-Cartographer main entry point
//!
//! This is the command-line interface for the Site-Cartographer website mapper.

use anyhow::Context;
use clap::builder::BoolishValueParser;
use clap::Parser;
use site_cartographer::config::{load_config_with_hash, validate, Config};
use site_cartographer::crawler::{crawl, sitemap_location};
use site_cartographer::output::{print_statistics, read_site_map, site_map_to_json};
use site_cartographer::CrawlScope;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Cartographer: a depth-bounded website structure mapper
///
/// Walks a website from a seed URL, records status, size, timing and
/// outbound links for every in-scope page, merges pages listed in the
/// site's sitemap, and removes duplicate text artifacts.
#[derive(Parser, Debug)]
#[command(name = "site-cartographer")]
#[command(version = "1.0.0")]
#[command(about = "A depth-bounded website structure mapper", long_about = None)]
struct Cli {
    /// URL to start crawling from; its host is the crawl boundary
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Viewport width for captures (pixels)
    #[arg(value_name = "VIEWPORT_WIDTH")]
    viewport_width: Option<u32>,

    /// Skip URLs with a language/locale path segment (true/false, yes/no, 1/0)
    #[arg(value_name = "EXCLUDE_TRANSLATIONS", value_parser = BoolishValueParser::new())]
    exclude_translations: Option<bool>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum link depth to follow from the seed
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Skip the sitemap merge pass
    #[arg(long)]
    no_sitemap: bool,

    /// Keep duplicate text artifacts
    #[arg(long)]
    no_dedup: bool,

    /// Directory under which the per-site output folder is created
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Print the final site map JSON to stdout instead of statistics
    #[arg(long)]
    print: bool,

    /// Validate the configuration and show what would be crawled
    #[arg(long, conflicts_with = "print")]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid settings")?;

    let scope = CrawlScope::from_seed(
        &cli.seed,
        config.crawler.max_depth,
        config.crawler.exclude_translations,
    )
    .with_context(|| format!("Cannot crawl {}", cli.seed))?;

    if cli.dry_run {
        return handle_dry_run(&config, &cli.seed, &scope);
    }

    let summary = crawl(&config, &cli.seed, config_hash)
        .await
        .with_context(|| format!("Crawl of {} failed", cli.seed))?;

    if cli.print {
        let site_map = read_site_map(&summary.site_map_path)
            .with_context(|| format!("Failed to read {}", summary.site_map_path.display()))?;
        println!("{}", site_map_to_json(&site_map)?);
    } else {
        print_statistics(&summary.stats);
        println!("Site map: {}", summary.site_map_path.display());
    }

    Ok(())
}

/// Command-line values take precedence over the configuration file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(width) = cli.viewport_width {
        config.crawler.viewport_width = width;
    }
    if let Some(exclude) = cli.exclude_translations {
        config.crawler.exclude_translations = exclude;
    }
    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if cli.no_sitemap {
        config.crawler.sitemap = false;
    }
    if cli.no_dedup {
        config.crawler.dedup = false;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.base_dir = dir.display().to_string();
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so `--print` output stays clean JSON.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_cartographer=info,warn"),
            1 => EnvFilter::new("site_cartographer=debug,info"),
            2 => EnvFilter::new("site_cartographer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config, seed: &str, scope: &CrawlScope) -> anyhow::Result<()> {
    println!("=== Site-Cartographer Dry Run ===\n");

    println!("Scope:");
    println!("  Seed: {}", seed);
    println!("  Base domain: {} (and subdomains)", scope.base_domain);
    println!("  Max depth: {}", scope.max_depth);
    println!(
        "  Translations: {}",
        if scope.exclude_translations {
            "excluded"
        } else {
            "included"
        }
    );

    println!("\nCapture:");
    println!(
        "  Viewport: {}x{}",
        config.crawler.viewport_width, config.crawler.viewport_height
    );
    println!(
        "  Page load timeout: {}s",
        config.http.page_load_timeout_secs
    );
    println!("  User agent: {}", config.http.user_agent);
    println!("  Cookies: {}", config.http.cookies.len());

    println!("\nVerification retries:");
    println!("  Attempts: {}", config.retry.max_attempts);
    println!("  Base delay: {}ms", config.retry.base_delay_ms);

    println!("\nPasses:");
    if config.crawler.sitemap {
        println!(
            "  Sitemap merge from {}",
            sitemap_location(seed, &config.crawler.sitemap_path)?
        );
    } else {
        println!("  Sitemap merge disabled");
    }
    println!(
        "  Deduplication {}",
        if config.crawler.dedup {
            "enabled"
        } else {
            "disabled"
        }
    );

    println!("\nOutput:");
    println!("  Base directory: {}", config.output.base_dir);

    println!("\n✓ Configuration is valid");

    Ok(())
}
