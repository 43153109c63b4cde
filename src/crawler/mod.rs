//! Crawler module for sitemap discovery and page scraping
//!
//! This module contains the scraping pipeline, including:
//! - HTTP fetching with User-Agent rotation and a request timeout
//! - Sitemap decoding
//! - Image and meta description extraction
//! - Bounded-concurrency coordination of per-page tasks

mod coordinator;
mod extractor;
mod fetcher;
mod sitemap;
mod user_agent;

pub use coordinator::{ConcurrencyBudget, ScrapeCoordinator};
pub use extractor::{Extractor, HtmlExtractor, PageRecord};
pub use fetcher::{build_http_client, Document, Fetcher, HttpFetcher};
pub use sitemap::{parse_sitemap, read_sitemap};
pub use user_agent::UserAgentPool;

use crate::config::Config;
use crate::output::{ReportWriter, ScrapeStatistics};
use crate::HarvestError;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Runs a complete scrape
///
/// This is the main entry point for a run. It will:
/// 1. Create the report file
/// 2. Build the HTTP fetcher
/// 3. Read the sitemap
/// 4. Scrape every listed page under the concurrency budget
/// 5. Write the report
///
/// Steps 1 and 3 are fatal on failure. Page failures only reduce the number
/// of records.
///
/// # Arguments
///
/// * `config` - A validated configuration
///
/// # Returns
///
/// * `Ok(ScrapeStatistics)` - The run finished and the report was written
/// * `Err(HarvestError)` - The run was aborted
pub async fn run_scrape(config: &Config) -> Result<ScrapeStatistics, HarvestError> {
    let report = ReportWriter::create(Path::new(&config.output.report_path))?;

    let user_agents = UserAgentPool::new(config.user_agent.pool.clone())?;
    let timeout = Duration::from_secs(config.scraper.request_timeout_secs);
    let fetcher = Arc::new(HttpFetcher::new(user_agents, timeout)?);

    let urls = read_sitemap(fetcher.as_ref(), &config.sitemap.url).await?;
    let urls_discovered = urls.len();

    let budget = ConcurrencyBudget::new(config.scraper.concurrency as usize)?;
    let coordinator = ScrapeCoordinator::new(fetcher, Arc::new(HtmlExtractor::new()), budget);
    let records = coordinator.scrape(urls).await;

    let report_path = report.path().display().to_string();
    let written = report.write_records(&records)?;
    tracing::info!("Wrote {} records to {}", written, report_path);

    Ok(ScrapeStatistics::from_records(urls_discovered, &records))
}
