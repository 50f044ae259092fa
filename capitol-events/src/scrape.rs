//! The per-chamber scrape: weekly calendar rows in, events out.
use capitol_common::{Chamber, RowFailurePolicy};
use serde::Serialize;
use url::Url;

use crate::agenda::{self, AgendaLink, AgendaMarkers, PageShape};
use crate::calendar::{self, CalendarRow, RawRow};
use crate::error::ScrapeError;
use crate::model::{BillRelation, DocumentKind, Event, EventKind, ParticipantRole};
use crate::page::{Page, PageFetcher};
use crate::sink::EventSink;

#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub calendar_url: Url,
    pub markers: AgendaMarkers,
    /// Levels of agenda list pages to follow. At 1, a list's links are read
    /// as real agendas without being classified again.
    pub list_depth: usize,
    pub row_failures: RowFailurePolicy,
}

impl ScrapeSettings {
    pub fn new(calendar_url: Url) -> Self {
        Self {
            calendar_url,
            markers: AgendaMarkers::default(),
            list_depth: 1,
            row_failures: RowFailurePolicy::FailFast,
        }
    }
}

/// Counters for one `scrape` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeReport {
    pub tables: usize,
    pub emitted: usize,
    pub skipped_spacer: usize,
    pub skipped_chamber: usize,
    pub failed: usize,
}

// How a pending agenda page is read.
#[derive(Debug, Clone, Copy)]
enum AgendaRead {
    Classify { lists_left: usize },
    Real,
}

pub struct EventScraper<F> {
    fetcher: F,
    settings: ScrapeSettings,
}

impl<F: PageFetcher> EventScraper<F> {
    pub fn new(fetcher: F, settings: ScrapeSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Scrape the weekly calendar for one chamber, handing each event to `sink`.
    ///
    /// Rows whose chamber cell equals the requested chamber's label are
    /// skipped. That is the calendar's long-standing filter and it is kept
    /// as is; it reads inverted.
    pub async fn scrape<S>(
        &self,
        chamber: Chamber,
        session: &str,
        sink: &mut S,
    ) -> Result<ScrapeReport, ScrapeError>
    where
        S: EventSink + ?Sized,
    {
        let calendar_url = &self.settings.calendar_url;
        tracing::info!(%chamber, session, url=%calendar_url, "scrape.start");

        let body = self.fetcher.fetch(calendar_url).await?;
        let tables = {
            let page = Page::parse(calendar_url.clone(), &body);
            calendar::parse_tables(&page)?
        };

        let mut report = ScrapeReport {
            tables: tables.len(),
            ..Default::default()
        };

        for table in tables {
            let Some(date) = table.date else {
                self.row_failed(
                    ScrapeError::MissingDateHeading { table: table.index },
                    &mut report,
                )?;
                continue;
            };

            for raw in &table.rows {
                if raw.is_spacer() {
                    report.skipped_spacer += 1;
                    continue;
                }
                match self.build_event(chamber, session, table.index, &date, raw).await {
                    Ok(Some(event)) => {
                        sink.save_event(event)?;
                        report.emitted += 1;
                    }
                    Ok(None) => report.skipped_chamber += 1,
                    Err(err) => self.row_failed(err, &mut report)?,
                }
            }
        }

        tracing::info!(
            %chamber,
            tables = report.tables,
            emitted = report.emitted,
            skipped_chamber = report.skipped_chamber,
            skipped_spacer = report.skipped_spacer,
            failed = report.failed,
            "scrape.finished"
        );
        Ok(report)
    }

    /// `Ok(None)` when the chamber filter drops the row.
    async fn build_event(
        &self,
        chamber: Chamber,
        session: &str,
        table: usize,
        date: &str,
        raw: &RawRow,
    ) -> Result<Option<Event>, ScrapeError> {
        let row = CalendarRow::from_cells(table, raw)?;

        // Exact comparison on the untouched cell text.
        if row.chamber.raw == chamber.label() {
            tracing::info!(
                table,
                row = raw.index,
                row_chamber = %row.chamber.raw,
                "calendar.row.skipped_chamber"
            );
            return Ok(None);
        }

        let when = row.when(date)?;
        let description = row.kind.text.clone();
        let mut event = Event::new(
            session,
            when,
            EventKind::CommitteeMeeting,
            description.clone(),
            row.location.text.clone(),
        );
        event.add_participant(description, ParticipantRole::Host, chamber);
        event.add_source(self.settings.calendar_url.as_str());

        for link in &row.agenda.links {
            if link.text.is_empty() {
                continue;
            }
            let url = link.resolve(&self.settings.calendar_url)?;
            let agenda_link = AgendaLink::route(&link.text, url, &self.settings.markers);
            self.add_agenda(agenda_link, &mut event).await?;
        }

        tracing::debug!(
            table,
            row = raw.index,
            when = %event.when,
            description = %event.description,
            bills = event.related_bills.len(),
            documents = event.documents.len(),
            "calendar.row.event"
        );
        Ok(Some(event))
    }

    fn row_failed(&self, err: ScrapeError, report: &mut ScrapeReport) -> Result<(), ScrapeError> {
        if err.is_fatal() || self.settings.row_failures == RowFailurePolicy::FailFast {
            return Err(err);
        }
        tracing::warn!(error = %err, "calendar.row.failed");
        report.failed += 1;
        Ok(())
    }

    /// Record one agenda-column link on `event`.
    pub async fn add_agenda(&self, link: AgendaLink, event: &mut Event) -> Result<(), ScrapeError> {
        match link {
            AgendaLink::CalendarMain(url) => self.classify_and_extend(url, event).await,
            AgendaLink::ScheduleDoc { name, url } => {
                event.add_document(name, url, DocumentKind::Agenda);
                Ok(())
            }
            AgendaLink::Other { name, url } => {
                event.add_document(name, url, DocumentKind::Other);
                Ok(())
            }
        }
    }

    /// Classify a calendar-main page and add the bills it (or the pages it
    /// lists) puts under consideration.
    pub async fn classify_and_extend(
        &self,
        url: Url,
        event: &mut Event,
    ) -> Result<(), ScrapeError> {
        let mut pending = vec![(
            url,
            AgendaRead::Classify {
                lists_left: self.settings.list_depth,
            },
        )];

        while let Some((url, read)) = pending.pop() {
            let body = self.fetcher.fetch(&url).await?;
            let page = Page::parse(url.clone(), &body);

            let lists_left = match read {
                AgendaRead::Real => {
                    extend_from_real(&page, event)?;
                    continue;
                }
                AgendaRead::Classify { lists_left } => lists_left,
            };

            let shape = agenda::classify(&page)?;
            let rows = agenda::row_count(&page)?;
            tracing::debug!(url=%url, shape=shape.as_str(), rows, "agenda.classified");

            match shape {
                PageShape::Real => extend_from_real(&page, event)?,
                PageShape::List if lists_left == 0 => {
                    tracing::warn!(url=%url, "agenda.list_depth_exhausted");
                }
                PageShape::List => {
                    let next = match lists_left - 1 {
                        0 => AgendaRead::Real,
                        left => AgendaRead::Classify { lists_left: left },
                    };
                    let targets = agenda::list_targets(&page)?;
                    tracing::debug!(url=%url, targets=targets.len(), "agenda.list");
                    pending.extend(targets.into_iter().rev().map(|t| (t, next)));
                }
            }
        }
        Ok(())
    }

    /// Fetch and classify a single agenda page.
    pub async fn classify(&self, url: &Url) -> Result<PageShape, ScrapeError> {
        let body = self.fetcher.fetch(url).await?;
        let page = Page::parse(url.clone(), &body);
        agenda::classify(&page)
    }
}

/// Register a real agenda's bills, and the agenda itself as source and document.
fn extend_from_real(page: &Page, event: &mut Event) -> Result<(), ScrapeError> {
    for bill_id in agenda::bill_ids(page)? {
        event.add_related_bill(bill_id, BillRelation::Consideration);
    }
    event.add_source(page.url().as_str());
    event.add_document("Agenda", page.url().as_str(), DocumentKind::Agenda);
    Ok(())
}
