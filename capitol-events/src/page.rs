//! Fetching and structural helpers over parsed HTML.
//!
//! A [`Page`] pairs a parsed document with the URL it came from, so every
//! href read through it comes back absolute. Parsed documents are not kept
//! across await points: callers turn what they need into owned data first.
use std::sync::Arc;

use async_trait::async_trait;
use capitol_http::{HttpClient, HttpError, RequestOpts};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::ScrapeError;

/// Source of raw HTML for a URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, HttpError>;
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &Url) -> Result<String, HttpError> {
        self.get_text(url, RequestOpts::default()).await
    }
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &Url) -> Result<String, HttpError> {
        (**self).fetch(url).await
    }
}

pub struct Page {
    url: Url,
    html: Html,
}

impl Page {
    pub fn parse(url: Url, body: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(body),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// All elements in the document matching `css`, in document order.
    pub fn select_all(&self, css: &'static str) -> Result<Vec<ElementRef<'_>>, ScrapeError> {
        let selector = selector(css)?;
        Ok(self.html.select(&selector).collect())
    }

    pub fn resolve(&self, href: &str) -> Result<Url, ScrapeError> {
        resolve_href(&self.url, href)
    }
}

pub fn selector(css: &'static str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{css}: {e}")))
}

pub fn resolve_href(base: &Url, href: &str) -> Result<Url, ScrapeError> {
    base.join(href.trim()).map_err(|source| ScrapeError::Url {
        base: base.to_string(),
        href: href.to_string(),
        source,
    })
}

/// Concatenated descendant text with runs of whitespace collapsed to one space.
pub fn text_content(el: ElementRef<'_>) -> String {
    let raw: String = el.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Element children of `el` with the given tag name.
pub fn child_elements<'a>(
    el: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

/// Rows belonging to `table` itself, looking through the implicit
/// `thead`/`tbody`/`tfoot` wrappers the HTML parser inserts.
pub fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(child_elements(child, "tr")),
            _ => {}
        }
    }
    rows
}

/// Text of the element sibling immediately before `el`'s parent.
pub fn heading_before_parent(el: ElementRef<'_>) -> Option<String> {
    let parent = el.parent().and_then(ElementRef::wrap)?;
    parent
        .prev_siblings()
        .find_map(ElementRef::wrap)
        .map(text_content)
}
