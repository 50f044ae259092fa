#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use capitol_events::{EventScraper, PageFetcher, ScrapeSettings};
use capitol_http::{HttpError, StatusCode, Url};

pub const CALENDAR_URL: &str = "http://cal.test/apps/schedule/WeeklyView.aspx";
pub const REAL_URL: &str = "http://cal.test/apps/schedule/CalendarMain.aspx?id=1";
pub const LIST_URL: &str = "http://cal.test/apps/schedule/CalendarMain.aspx?id=2";

pub const WEEKLY: &str = include_str!("../fixtures/weekly.html");
pub const AGENDA_REAL: &str = include_str!("../fixtures/agenda_real.html");
pub const AGENDA_LIST: &str = include_str!("../fixtures/agenda_list.html");

/// Serves canned pages by absolute URL and remembers what was asked for.
#[derive(Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, HttpError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| HttpError::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
                snippet: String::new(),
            })
    }
}

pub fn settings() -> ScrapeSettings {
    ScrapeSettings::new(Url::parse(CALENDAR_URL).unwrap())
}

pub fn weekly_fetcher() -> FixtureFetcher {
    FixtureFetcher::default()
        .with_page(CALENDAR_URL, WEEKLY)
        .with_page(REAL_URL, AGENDA_REAL)
        .with_page(LIST_URL, AGENDA_LIST)
}

pub fn scraper(fetcher: FixtureFetcher) -> EventScraper<FixtureFetcher> {
    EventScraper::new(fetcher, settings())
}

/// A one-day weekly page with the given `<tr>` bodies.
pub fn weekly_with_rows(date: &str, rows: &[String]) -> String {
    let rows: String = rows.iter().map(|r| format!("<tr>{r}</tr>\n")).collect();
    format!(
        "<!DOCTYPE html><html><body><h3>{date}</h3><div><table class=\"date-table\">\n{rows}</table></div></body></html>"
    )
}

pub fn row(time: &str, chamber: &str, kind: &str, agenda: &str, location: &str) -> String {
    format!(
        "<td>{time}</td><td>{chamber}</td><td>{kind}</td><td>{agenda}</td><td>{location}</td><td></td>"
    )
}
