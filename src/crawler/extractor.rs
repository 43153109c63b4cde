//! HTML extraction of image references and meta description
//!
//! This module turns a fetched [`Document`] into a [`PageRecord`]:
//! - `src` of every `<img>` that has one, in document order
//! - `content` of the first `<meta name="description...">`
//! - Status code and effective URL from the response

use crate::crawler::fetcher::Document;
use crate::ExtractError;
use scraper::{Html, Selector};

/// Extracted information from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Effective URL the page was served from
    pub source_url: String,

    /// HTTP status code of the response
    pub status_code: u16,

    /// `src` attributes of `<img>` elements, verbatim and in document order
    pub image_refs: Vec<String>,

    /// Meta description, empty when the page has none
    pub meta_snippet: String,
}

/// Turns a fetched document into a record
///
/// Implementations must be pure: the same document always yields the same
/// record.
pub trait Extractor: Send + Sync {
    fn extract(&self, document: &Document) -> Result<PageRecord, ExtractError>;
}

/// Default [`Extractor`] built on the `scraper` HTML parser
///
/// Selectors are compiled once and shared by every page.
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    img_selector: Selector,
    meta_selector: Selector,
}

impl HtmlExtractor {
    pub fn new() -> Self {
        Self {
            img_selector: Selector::parse("img[src]").expect("img selector is valid CSS"),
            meta_selector: Selector::parse(r#"meta[name^="description"]"#)
                .expect("meta selector is valid CSS"),
        }
    }

    /// Collects `src` of every `<img>` carrying the attribute
    fn image_refs(&self, html: &Html) -> Vec<String> {
        html.select(&self.img_selector)
            .filter_map(|element| element.value().attr("src"))
            .map(str::to_string)
            .collect()
    }

    /// Reads `content` of the first meta element named `description*`
    fn meta_description(&self, html: &Html) -> String {
        html.select(&self.meta_selector)
            .next()
            .and_then(|element| element.value().attr("content"))
            .unwrap_or_default()
            .to_string()
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for HtmlExtractor {
    /// Parses the document body and extracts the record
    ///
    /// The HTML5 parser recovers from any markup, so the only body it
    /// refuses is one with no content at all.
    ///
    /// # Example
    ///
    /// ```
    /// use img_harvest::crawler::{Document, Extractor, HtmlExtractor};
    ///
    /// let document = Document {
    ///     url: "https://example.com/".to_string(),
    ///     status_code: 200,
    ///     body: r#"<html><body><img src="a.png"></body></html>"#.to_string(),
    /// };
    /// let record = HtmlExtractor::new().extract(&document).unwrap();
    /// assert_eq!(record.image_refs, vec!["a.png".to_string()]);
    /// ```
    fn extract(&self, document: &Document) -> Result<PageRecord, ExtractError> {
        if document.body.trim().is_empty() {
            return Err(ExtractError::EmptyDocument {
                url: document.url.clone(),
            });
        }

        let html = Html::parse_document(&document.body);

        Ok(PageRecord {
            source_url: document.url.clone(),
            status_code: document.status_code,
            image_refs: self.image_refs(&html),
            meta_snippet: self.meta_description(&html),
        })
    }
}
