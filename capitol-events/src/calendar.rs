//! Weekly calendar parsing: one `table.date-table` per day, one row per meeting.
//!
//! Parsing produces owned [`CalendarTable`]s so the document can be dropped
//! before agenda pages are fetched. Turning a [`RawRow`] into a
//! [`CalendarRow`] is where the positional column schema is enforced.
use chrono::NaiveDateTime;
use scraper::ElementRef;
use url::Url;

use crate::error::ScrapeError;
use crate::page::{
    child_elements, heading_before_parent, resolve_href, table_rows, text_content, Page,
};

/// Column order of the weekly calendar.
pub const COLUMNS: [&str; 6] = ["time", "chamber", "type", "agenda", "location", "video"];

pub const DATETIME_FORMAT: &str = "%A, %B %d, %Y %I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: Option<String>,
}

impl Link {
    pub fn resolve(&self, base: &Url) -> Result<Url, ScrapeError> {
        match &self.href {
            Some(href) => resolve_href(base, href),
            None => Err(ScrapeError::MissingHref {
                url: base.to_string(),
                text: self.text.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    /// Whitespace-collapsed text.
    pub text: String,
    /// Descendant text exactly as it appears in the document.
    pub raw: String,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub index: usize,
    pub cells: Vec<Cell>,
}

impl RawRow {
    /// Rows without `td` cells (header and separator rows).
    pub fn is_spacer(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarTable {
    pub index: usize,
    pub date: Option<String>,
    pub rows: Vec<RawRow>,
}

/// A calendar row with its cells bound to named columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRow {
    pub time: Cell,
    pub chamber: Cell,
    pub kind: Cell,
    pub agenda: Cell,
    pub location: Cell,
    pub video: Cell,
}

impl CalendarRow {
    /// Bind cells to [`COLUMNS`]. Fewer than six cells is a malformed row;
    /// cells past the sixth are ignored.
    pub fn from_cells(table: usize, row: &RawRow) -> Result<Self, ScrapeError> {
        let c = &row.cells;
        if c.len() < COLUMNS.len() {
            return Err(ScrapeError::MalformedRow {
                table,
                row: row.index,
                cells: c.len(),
            });
        }
        Ok(Self {
            time: c[0].clone(),
            chamber: c[1].clone(),
            kind: c[2].clone(),
            agenda: c[3].clone(),
            location: c[4].clone(),
            video: c[5].clone(),
        })
    }

    /// Combine the day heading with this row's time cell.
    pub fn when(&self, date: &str) -> Result<NaiveDateTime, ScrapeError> {
        parse_when(date, &self.time.text)
    }
}

pub fn parse_when(date: &str, time: &str) -> Result<NaiveDateTime, ScrapeError> {
    let input = format!("{date} {time}");
    NaiveDateTime::parse_from_str(&input, DATETIME_FORMAT)
        .map_err(|source| ScrapeError::DateTime { input, source })
}

/// Every `table.date-table` on the weekly page, in document order.
pub fn parse_tables(page: &Page) -> Result<Vec<CalendarTable>, ScrapeError> {
    let link_selector = crate::page::selector("a")?;
    let tables = page
        .select_all("table.date-table")?
        .into_iter()
        .enumerate()
        .map(|(index, table)| CalendarTable {
            index,
            date: heading_before_parent(table),
            rows: table_rows(table)
                .into_iter()
                .enumerate()
                .map(|(index, tr)| RawRow {
                    index,
                    cells: child_elements(tr, "td")
                        .map(|td| cell(td, &link_selector))
                        .collect(),
                })
                .collect(),
        })
        .collect();
    Ok(tables)
}

fn cell(td: ElementRef<'_>, links: &scraper::Selector) -> Cell {
    Cell {
        text: text_content(td),
        raw: td.text().collect(),
        links: td
            .select(links)
            .map(|a| Link {
                text: text_content(a),
                href: a.value().attr("href").map(str::to_string),
            })
            .collect(),
    }
}
