//! Normalised event records handed to an [`EventSink`](crate::sink::EventSink).
use capitol_common::Chamber;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "committee:meeting")]
    CommitteeMeeting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Host,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub role: ParticipantRole,
    pub chamber: Chamber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillRelation {
    Consideration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedBill {
    pub bill_id: String,
    #[serde(rename = "type")]
    pub relation: BillRelation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Agenda,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
}

/// A committee meeting scraped from one calendar row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub session: String,
    pub when: NaiveDateTime,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub description: String,
    pub location: String,
    pub participants: Vec<Participant>,
    pub related_bills: Vec<RelatedBill>,
    pub sources: Vec<Source>,
    pub documents: Vec<Document>,
}

impl Event {
    pub fn new(
        session: impl Into<String>,
        when: NaiveDateTime,
        kind: EventKind,
        description: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            session: session.into(),
            when,
            kind,
            description: description.into(),
            location: location.into(),
            participants: Vec::new(),
            related_bills: Vec::new(),
            sources: Vec::new(),
            documents: Vec::new(),
        }
    }

    pub fn add_participant(
        &mut self,
        name: impl Into<String>,
        role: ParticipantRole,
        chamber: Chamber,
    ) {
        self.participants.push(Participant {
            name: name.into(),
            role,
            chamber,
        });
    }

    /// Appends unconditionally; the same bill may be listed twice.
    pub fn add_related_bill(&mut self, bill_id: impl Into<String>, relation: BillRelation) {
        self.related_bills.push(RelatedBill {
            bill_id: bill_id.into(),
            relation,
        });
    }

    pub fn add_source(&mut self, url: impl Into<String>) {
        self.sources.push(Source { url: url.into() });
    }

    pub fn add_document(
        &mut self,
        name: impl Into<String>,
        url: impl Into<String>,
        kind: DocumentKind,
    ) {
        self.documents.push(Document {
            name: name.into(),
            url: url.into(),
            kind,
        });
    }
}
