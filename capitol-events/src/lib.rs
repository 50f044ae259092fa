//! Committee meeting events from a legislature's weekly HTML calendar.
//!
//! The pipeline, leaf first:
//!
//! - [`page`]: fetching ([`PageFetcher`]) and structural HTML helpers
//! - [`agenda`]: routing agenda links, classifying agenda pages, reading bill ids
//! - [`calendar`]: `table.date-table` parsing and the positional row schema
//! - [`scrape`]: [`EventScraper`], which ties the above into events
//! - [`sink`]: where events go ([`MemorySink`], [`JsonLinesSink`])
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use capitol_common::Chamber;
//! use capitol_events::{EventScraper, MemorySink, ScrapeSettings};
//!
//! let settings = ScrapeSettings::new(
//!     "http://wapp.capitol.tn.gov/apps/schedule/WeeklyView.aspx".parse()?,
//! );
//! let scraper = EventScraper::new(capitol_http::HttpClient::new()?, settings);
//! let mut sink = MemorySink::default();
//! let report = scraper.scrape(Chamber::Upper, "109", &mut sink).await?;
//! assert_eq!(report.emitted, sink.events.len());
//! # Ok(()) }
//! ```
pub mod agenda;
pub mod calendar;
pub mod error;
pub mod model;
pub mod page;
pub mod scrape;
pub mod sink;

pub use agenda::{AgendaLink, AgendaMarkers, PageShape};
pub use error::{ScrapeError, SinkError};
pub use model::{
    BillRelation, Document, DocumentKind, Event, EventKind, Participant, ParticipantRole,
    RelatedBill, Source,
};
pub use page::{Page, PageFetcher};
pub use scrape::{EventScraper, ScrapeReport, ScrapeSettings};
pub use sink::{EventSink, JsonLinesSink, MemorySink};
