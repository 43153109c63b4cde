//! Output module for scrape reports and statistics
//!
//! This module handles:
//! - Writing the per-page text report
//! - Computing and printing run statistics

mod report;
pub mod stats;

pub use report::{format_record, ReportWriter};
pub use stats::{print_statistics, ScrapeStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output file {path}: {source}")]
    Create {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
