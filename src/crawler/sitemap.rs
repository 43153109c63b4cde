//! Sitemap reading
//!
//! A sitemap is expected to look like:
//!
//! ```xml
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url><loc>https://example.com/a</loc></url>
//!   <url><loc>https://example.com/b</loc></url>
//! </urlset>
//! ```
//!
//! Unlike page scraping, reading the sitemap is all or nothing: a fetch or
//! decode failure aborts the run.

use crate::crawler::fetcher::Fetcher;
use crate::{HarvestError, SitemapError};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Fetches a sitemap and returns its page URLs in document order
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Page URLs, duplicates preserved
/// * `Err(HarvestError)` - The sitemap could not be fetched or decoded
pub async fn read_sitemap(fetcher: &dyn Fetcher, url: &str) -> Result<Vec<String>, HarvestError> {
    tracing::info!("Reading sitemap: {}", url);

    let document = fetcher.fetch(url).await?;

    if !(200..300).contains(&document.status_code) {
        tracing::warn!(
            "Sitemap {} answered with HTTP {}, decoding anyway",
            url,
            document.status_code
        );
    }

    let urls = parse_sitemap(&document.body).map_err(|source| HarvestError::Sitemap {
        url: url.to_string(),
        source,
    })?;

    tracing::info!("Sitemap lists {} URLs", urls.len());
    Ok(urls)
}

/// Decodes a `<urlset>` document into the text of its `url/loc` entries
///
/// Namespace prefixes are ignored. `<url>` entries with a missing or blank
/// `<loc>` are skipped.
///
/// # Example
///
/// ```
/// use img_harvest::crawler::parse_sitemap;
///
/// let xml = "<urlset><url><loc>https://x/1</loc></url></urlset>";
/// assert_eq!(parse_sitemap(xml).unwrap(), vec!["https://x/1".to_string()]);
/// ```
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    // Local names of the currently open elements, root first
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut saw_root = false;
    let mut current_loc: Option<String> = None;
    let mut urls = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                let name = element.local_name().as_ref().to_vec();
                if path.is_empty() {
                    check_root(&name, saw_root)?;
                    saw_root = true;
                }
                path.push(name);

                if is_loc(&path) {
                    current_loc = Some(String::new());
                }
            }
            Event::Empty(element) => {
                // <urlset/> is a valid, empty sitemap; <loc/> is skipped
                if path.is_empty() {
                    check_root(element.local_name().as_ref(), saw_root)?;
                    saw_root = true;
                }
            }
            Event::Text(text) => {
                if let Some(loc) = current_loc.as_mut() {
                    loc.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(loc) = current_loc.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                if path.is_empty() {
                    return Err(SitemapError::Malformed(
                        "closing tag without matching opening tag".to_string(),
                    ));
                }

                if is_loc(&path) {
                    if let Some(loc) = current_loc.take() {
                        let loc = loc.trim();
                        if !loc.is_empty() {
                            urls.push(loc.to_string());
                        }
                    }
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(SitemapError::MissingRoot);
    }

    if let Some(open) = path.last() {
        return Err(SitemapError::Malformed(format!(
            "unexpected end of document inside <{}>",
            String::from_utf8_lossy(open)
        )));
    }

    Ok(urls)
}

fn check_root(name: &[u8], saw_root: bool) -> Result<(), SitemapError> {
    if saw_root {
        return Err(SitemapError::Malformed(
            "multiple root elements".to_string(),
        ));
    }

    if name != b"urlset" {
        return Err(SitemapError::UnexpectedRoot(
            String::from_utf8_lossy(name).into_owned(),
        ));
    }

    Ok(())
}

/// `urlset > url > loc`
fn is_loc(path: &[Vec<u8>]) -> bool {
    path.len() == 3 && path[1] == b"url" && path[2] == b"loc"
}
