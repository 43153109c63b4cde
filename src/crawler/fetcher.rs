//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper:
//! - Building the HTTP client with a fixed request timeout
//! - Rotating the User-Agent header on every request
//! - Classifying transport failures
//!
//! Non-2xx responses are not failures here; they come back as ordinary
//! documents carrying their status code. Nothing in this module logs errors.

use crate::crawler::user_agent::UserAgentPool;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Redirect hops followed before giving up
const MAX_REDIRECTS: usize = 10;

/// A fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Response body
    pub body: String,
}

/// Something that can retrieve a URL
///
/// The coordinator shares one fetcher across all of its tasks, so
/// implementations must be `Send + Sync`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieves `url`, returning the document or the reason it failed
    async fn fetch(&self, url: &str) -> Result<Document, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `timeout` - Upper bound on a whole request, body included
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by reqwest
pub struct HttpFetcher {
    client: Client,
    user_agents: UserAgentPool,
}

impl HttpFetcher {
    /// Creates a fetcher with its own client
    ///
    /// # Example
    ///
    /// ```no_run
    /// use img_harvest::crawler::{HttpFetcher, UserAgentPool};
    /// use std::time::Duration;
    ///
    /// let fetcher = HttpFetcher::new(UserAgentPool::default(), Duration::from_secs(10)).unwrap();
    /// ```
    pub fn new(user_agents: UserAgentPool, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout)?,
            user_agents,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        let target = parse_target(url)?;
        let user_agent = self.user_agents.pick();

        tracing::trace!("GET {} as {}", url, user_agent);

        let response = self
            .client
            .get(target)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();

        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        Ok(Document {
            url: final_url,
            status_code,
            body,
        })
    }
}

/// Parses and checks the scheme of a URL before any network activity
fn parse_target(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Maps a reqwest error onto the fetch error kinds
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            source: error,
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
