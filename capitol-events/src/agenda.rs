//! Agenda links found in the calendar's agenda column.
//!
//! A link is first routed by its href ([`AgendaLink::route`]). Calendar-main
//! pages come in two shapes, told apart by whether the generated content
//! label holds an `h2`:
//!
//! - [`PageShape::Real`]: a table whose rows carry bill ids as the first cell's `id`
//! - [`PageShape::List`]: a table of links to `Real` pages
use url::Url;

use crate::error::ScrapeError;
use crate::page::{child_elements, table_rows, text_content, Page};

/// Substrings that decide how an agenda href is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaMarkers {
    pub calendar_main: String,
    pub schedule_docs: String,
}

impl Default for AgendaMarkers {
    fn default() -> Self {
        Self {
            calendar_main: "CalendarMain".to_string(),
            schedule_docs: "scheduledocs".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgendaLink {
    /// Fetched and classified.
    CalendarMain(Url),
    /// Recorded as an agenda document without fetching.
    ScheduleDoc { name: String, url: Url },
    /// Recorded as an "other" document.
    Other { name: String, url: Url },
}

impl AgendaLink {
    pub fn route(name: &str, url: Url, markers: &AgendaMarkers) -> Self {
        let href = url.as_str();
        if href.contains(&markers.calendar_main) {
            AgendaLink::CalendarMain(url)
        } else if href.contains(&markers.schedule_docs) {
            AgendaLink::ScheduleDoc {
                name: name.to_string(),
                url,
            }
        } else {
            AgendaLink::Other {
                name: name.to_string(),
                url,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageShape {
    Real,
    List,
}

impl PageShape {
    pub fn as_str(self) -> &'static str {
        match self {
            PageShape::Real => "real",
            PageShape::List => "list",
        }
    }
}

/// `Real` when `label#generatedcontent` contains an `h2`, `List` otherwise.
pub fn classify(page: &Page) -> Result<PageShape, ScrapeError> {
    let label = page
        .select_all("label#generatedcontent")?
        .into_iter()
        .next()
        .ok_or_else(|| ScrapeError::MissingGeneratedContent {
            url: page.url().to_string(),
        })?;
    let h2 = crate::page::selector("h2")?;
    if label.select(&h2).next().is_some() {
        Ok(PageShape::Real)
    } else {
        Ok(PageShape::List)
    }
}

/// Bill ids of a `Real` agenda: the `id` of each row's first child element.
pub fn bill_ids(page: &Page) -> Result<Vec<String>, ScrapeError> {
    page.select_all("tr")?
        .into_iter()
        .enumerate()
        .map(|(row, tr)| {
            tr.children()
                .find_map(scraper::ElementRef::wrap)
                .and_then(|first| first.value().id())
                .map(str::to_string)
                .ok_or_else(|| ScrapeError::MissingBillId {
                    url: page.url().to_string(),
                    row,
                })
        })
        .collect()
}

/// Targets of a `List` agenda: anchors directly inside each row's `td` cells.
pub fn list_targets(page: &Page) -> Result<Vec<Url>, ScrapeError> {
    let mut targets = Vec::new();
    for tr in page.select_all("tr")? {
        for td in child_elements(tr, "td") {
            for a in child_elements(td, "a") {
                let href = a.value().attr("href").ok_or_else(|| ScrapeError::MissingHref {
                    url: page.url().to_string(),
                    text: text_content(a),
                })?;
                targets.push(page.resolve(href)?);
            }
        }
    }
    Ok(targets)
}

/// Rows of every table on the page, for diagnostics.
pub fn row_count(page: &Page) -> Result<usize, ScrapeError> {
    Ok(page
        .select_all("table")?
        .into_iter()
        .map(|t| table_rows(t).len())
        .sum())
}
