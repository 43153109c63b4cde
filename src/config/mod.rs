//! Configuration module for img-harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; an empty file reproduces the built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use img_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Scraping sitemap: {}", config.sitemap.url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, ScraperConfig, SitemapConfig, UserAgentConfig, DEFAULT_CONCURRENCY,
    DEFAULT_REPORT_PATH, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SITEMAP_URL, DEFAULT_USER_AGENTS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, parse_config, read_config_with_hash};
pub use validation::validate;
