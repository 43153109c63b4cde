//! img-harvest: a sitemap-driven image scraper
//!
//! This crate reads a site's XML sitemap, fetches every listed page under a
//! fixed concurrency budget, extracts image references and the meta
//! description from each page, and writes the aggregated results to a text
//! report.

pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for img-harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to decode sitemap {url}: {source}")]
    Sitemap { url: String, source: SitemapError },

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors returned by a [`crawler::Fetcher`]
///
/// A non-2xx response is not an error; it comes back as a normal document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },
}

/// Errors returned by an [`crawler::Extractor`]
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Document from {url} is empty")]
    EmptyDocument { url: String },
}

/// Sitemap decoding errors
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Expected <urlset> root element, found <{0}>")]
    UnexpectedRoot(String),

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Malformed sitemap: {0}")]
    Malformed(String),
}

/// Result type alias for img-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    ConcurrencyBudget, Document, Extractor, Fetcher, HtmlExtractor, HttpFetcher, PageRecord,
    ScrapeCoordinator, UserAgentPool,
};
