//! Scrape coordinator - bounded-concurrency fetch and extract
//!
//! One task is spawned per input URL. The number of tasks doing work at the
//! same time is bounded by an admission gate (a semaphore sized to the
//! concurrency budget), not by a fixed worker pool. Each task:
//!
//! 1. Acquires a permit from the gate (waits while the budget is exhausted)
//! 2. Fetches the page
//! 3. Extracts a [`PageRecord`] and appends it to the shared collection
//! 4. Releases the permit, on every path
//! 5. Reports completion to the coordinator
//!
//! The coordinator returns once it has seen one completion per URL. Failed
//! pages are logged and contribute no record; they never fail the batch.

use crate::crawler::extractor::{Extractor, PageRecord};
use crate::crawler::fetcher::Fetcher;
use crate::{ConfigError, HarvestError};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Semaphore};

/// Maximum number of fetch tasks allowed in flight at once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyBudget(usize);

impl ConcurrencyBudget {
    /// Creates a budget, rejecting zero
    pub fn new(limit: usize) -> Result<Self, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::Validation(
                "concurrency budget must be at least 1".to_string(),
            ));
        }
        Ok(Self(limit))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ConcurrencyBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Drives one fetch+extract task per URL under a concurrency budget
pub struct ScrapeCoordinator<F: ?Sized, E: ?Sized> {
    fetcher: Arc<F>,
    extractor: Arc<E>,
    budget: ConcurrencyBudget,
}

impl<F, E> ScrapeCoordinator<F, E>
where
    F: Fetcher + ?Sized + 'static,
    E: Extractor + ?Sized + 'static,
{
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Shared by every task
    /// * `extractor` - Shared by every task
    /// * `budget` - Upper bound on tasks fetching at the same time
    pub fn new(fetcher: Arc<F>, extractor: Arc<E>, budget: ConcurrencyBudget) -> Self {
        Self {
            fetcher,
            extractor,
            budget,
        }
    }

    /// Scrapes every URL and returns the records that succeeded
    ///
    /// Records come back in completion order, not input order. The returned
    /// collection holds one record per URL that was fetched and extracted
    /// successfully; failures are logged and omitted.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use img_harvest::crawler::{
    ///     ConcurrencyBudget, HtmlExtractor, HttpFetcher, ScrapeCoordinator, UserAgentPool,
    /// };
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let fetcher = HttpFetcher::new(UserAgentPool::default(), Duration::from_secs(10))?;
    /// let coordinator = ScrapeCoordinator::new(
    ///     Arc::new(fetcher),
    ///     Arc::new(HtmlExtractor::new()),
    ///     ConcurrencyBudget::new(8)?,
    /// );
    /// let records = coordinator
    ///     .scrape(vec!["https://example.com/".to_string()])
    ///     .await;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scrape(&self, urls: Vec<String>) -> Vec<PageRecord> {
        let total = urls.len();
        if total == 0 {
            return Vec::new();
        }

        tracing::info!(
            "Scraping {} URLs with concurrency budget {}",
            total,
            self.budget
        );

        let gate = Arc::new(Semaphore::new(self.budget.get()));
        let records = Arc::new(Mutex::new(Vec::with_capacity(total)));
        let (done_tx, mut done_rx) = mpsc::channel::<()>(total);

        for url in urls {
            let gate = Arc::clone(&gate);
            let records = Arc::clone(&records);
            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(&self.extractor);
            let done_tx = done_tx.clone();

            tokio::spawn(async move {
                match gate.acquire_owned().await {
                    Ok(_permit) => {
                        tracing::debug!("Scraping URL: {}", url);

                        match scrape_page(&*fetcher, &*extractor, &url).await {
                            Ok(record) => records.lock().await.push(record),
                            Err(e) => tracing::warn!("Skipping {}: {}", url, e),
                        }
                    }
                    Err(e) => tracing::warn!("Admission gate closed before {}: {}", url, e),
                }

                // Capacity matches the task count, so this never waits
                let _ = done_tx.send(()).await;
            });
        }

        // Only the tasks hold senders now; if one of them dies without
        // reporting, recv() yields None once the rest have finished
        drop(done_tx);

        let mut completed = 0;
        while completed < total {
            match done_rx.recv().await {
                Some(()) => completed += 1,
                None => break,
            }
        }

        if completed < total {
            tracing::warn!(
                "{} of {} scrape tasks ended without reporting completion",
                total - completed,
                total
            );
        }

        let records = std::mem::take(&mut *records.lock().await);

        tracing::info!(
            "Scraped {} of {} URLs successfully",
            records.len(),
            total
        );

        records
    }
}

/// Fetches and extracts a single page
async fn scrape_page<F, E>(fetcher: &F, extractor: &E, url: &str) -> Result<PageRecord, HarvestError>
where
    F: Fetcher + ?Sized,
    E: Extractor + ?Sized,
{
    let document = fetcher.fetch(url).await?;
    Ok(extractor.extract(&document)?)
}
