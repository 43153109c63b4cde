//! Run statistics
//!
//! Aggregate counts for a finished scrape. Per-URL failure details are not
//! kept; a failed page is only visible here as the difference between URLs
//! discovered and pages scraped.

use crate::crawler::PageRecord;

/// Scrape statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeStatistics {
    /// URLs listed in the sitemap
    pub urls_discovered: usize,

    /// Pages fetched and extracted successfully
    pub pages_scraped: usize,

    /// Pages that failed to fetch or extract
    pub pages_failed: usize,

    /// Image references across all scraped pages
    pub images_found: usize,

    /// Scraped pages with a non-empty meta description
    pub pages_with_description: usize,

    /// Scraped pages that answered with a non-2xx status
    pub non_success_status: usize,
}

impl ScrapeStatistics {
    /// Computes statistics for a run over `urls_discovered` URLs
    pub fn from_records(urls_discovered: usize, records: &[PageRecord]) -> Self {
        let pages_scraped = records.len();

        Self {
            urls_discovered,
            pages_scraped,
            pages_failed: urls_discovered.saturating_sub(pages_scraped),
            images_found: records.iter().map(|r| r.image_refs.len()).sum(),
            pages_with_description: records
                .iter()
                .filter(|r| !r.meta_snippet.is_empty())
                .count(),
            non_success_status: records
                .iter()
                .filter(|r| !(200..300).contains(&r.status_code))
                .count(),
        }
    }

    /// Percentage of discovered URLs that produced a record
    pub fn success_rate(&self) -> f64 {
        if self.urls_discovered == 0 {
            return 0.0;
        }
        (self.pages_scraped as f64 / self.urls_discovered as f64) * 100.0
    }
}

/// Prints statistics to stdout in a human-readable format
pub fn print_statistics(stats: &ScrapeStatistics) {
    println!("=== Scrape Statistics ===\n");

    println!("Overview:");
    println!("  URLs discovered: {}", stats.urls_discovered);
    println!("  Pages scraped: {}", stats.pages_scraped);
    println!("  Pages failed: {}", stats.pages_failed);
    println!();

    println!("Content:");
    println!("  Images found: {}", stats.images_found);
    println!(
        "  Pages with meta description: {}",
        stats.pages_with_description
    );
    println!("  Pages with non-2xx status: {}", stats.non_success_status);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully scraped)",
        stats.success_rate(),
        stats.pages_scraped,
        stats.urls_discovered
    );
}
