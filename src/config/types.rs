use serde::Deserialize;

/// Sitemap consulted when no configuration overrides it
pub const DEFAULT_SITEMAP_URL: &str = "https://www.espn.com/googlenewssitemap";

/// Default number of pages fetched at once
pub const DEFAULT_CONCURRENCY: u32 = 50;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default report file
pub const DEFAULT_REPORT_PATH: &str = "image_results.txt";

/// Browser identities rotated across requests when no pool is configured
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:56.0) Gecko/20100101 Firefox/56.0",
];

/// Main configuration structure for img-harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sitemap: SitemapConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the list of pages comes from
#[derive(Debug, Clone, Deserialize)]
pub struct SitemapConfig {
    /// URL of the XML sitemap
    #[serde(default = "default_sitemap_url")]
    pub url: String,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Maximum number of page fetches in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// User agent rotation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Identities to choose from, one picked at random per request
    #[serde(default = "default_user_agents")]
    pub pool: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the text report
    #[serde(rename = "report-path", default = "default_report_path")]
    pub report_path: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            url: default_sitemap_url(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            pool: default_user_agents(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
        }
    }
}

fn default_sitemap_url() -> String {
    DEFAULT_SITEMAP_URL.to_string()
}

fn default_concurrency() -> u32 {
    DEFAULT_CONCURRENCY
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_user_agents() -> Vec<String> {
    DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
}

fn default_report_path() -> String {
    DEFAULT_REPORT_PATH.to_string()
}
