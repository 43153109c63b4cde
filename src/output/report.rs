//! Text report generation
//!
//! Each record becomes one block:
//!
//! ```text
//! URL: https://example.com/page
//! StatusCode: 200
//! Meta Description: A page
//! Images:
//! - /a.png
//! - /b.jpg
//!
//! ```

use crate::crawler::PageRecord;
use crate::output::{OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write-once report file
///
/// The file is created up front so an unwritable destination aborts the run
/// before any network work starts.
#[derive(Debug)]
pub struct ReportWriter {
    file: File,
    path: PathBuf,
}

impl ReportWriter {
    /// Creates (or truncates) the report file
    ///
    /// # Returns
    ///
    /// * `Ok(ReportWriter)` - The file is open for writing
    /// * `Err(OutputError::Create)` - The file could not be created
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path).map_err(|source| OutputError::Create {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every record and flushes the file
    ///
    /// A record that fails to write is logged and skipped; the remaining
    /// records are still attempted.
    ///
    /// # Returns
    ///
    /// The number of records written
    pub fn write_records(mut self, records: &[PageRecord]) -> OutputResult<usize> {
        let mut written = 0;

        for record in records {
            match self.file.write_all(format_record(record).as_bytes()) {
                Ok(()) => written += 1,
                Err(e) => tracing::warn!(
                    "Error writing to {} for URL {}: {}",
                    self.path.display(),
                    record.source_url,
                    e
                ),
            }
        }

        self.file.flush()?;
        Ok(written)
    }
}

/// Formats one record as a report block, trailing blank line included
pub fn format_record(record: &PageRecord) -> String {
    let mut block = format!(
        "URL: {}\nStatusCode: {}\nMeta Description: {}\nImages:\n",
        record.source_url, record.status_code, record.meta_snippet
    );

    for image in &record.image_refs {
        block.push_str(&format!("- {}\n", image));
    }

    block.push('\n');
    block
}
