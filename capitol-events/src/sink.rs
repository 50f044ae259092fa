//! Where finished events go.
use std::io::Write;

use crate::error::SinkError;
use crate::model::Event;

pub trait EventSink {
    fn save_event(&mut self, event: Event) -> Result<(), SinkError>;
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<Event>,
}

impl EventSink for MemorySink {
    fn save_event(&mut self, event: Event) -> Result<(), SinkError> {
        self.events.push(event);
        Ok(())
    }
}

/// Writes one JSON object per line and flushes after each event.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn save_event(&mut self, event: Event) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        tracing::debug!(
            when=%event.when,
            description=%event.description,
            written=self.written,
            "sink.event_written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventKind;
    use chrono::NaiveDate;

    #[test]
    fn writes_one_line_per_event() {
        let when = NaiveDate::from_ymd_opt(2015, 1, 6)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let mut sink = JsonLinesSink::new(Vec::new());
        for desc in ["Fiscal Review", "Education"] {
            sink.save_event(Event::new("109", when, EventKind::CommitteeMeeting, desc, "LP 16"))
                .unwrap();
        }
        assert_eq!(sink.written(), 2);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Event = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.description, "Fiscal Review");
        assert_eq!(first.when, when);
    }
}
