//! Configuration module for Site-Cartographer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: `Config::default()` is a complete, valid
//! configuration and command-line arguments override individual values.
//!
//! # Example
//!
//! ```no_run
//! use site_cartographer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("cartographer.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, OutputConfig, RetryConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
