use capitol_http::HttpError;
use thiserror::Error;

/// Everything that can stop a calendar row (or a whole scrape) from producing an event.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] HttpError),

    #[error("cannot resolve `{href}` against {base}: {source}")]
    Url {
        base: String,
        href: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid selector `{0}`")]
    Selector(String),

    #[error("calendar table {table} has no date heading")]
    MissingDateHeading { table: usize },

    #[error("calendar table {table} row {row} has {cells} cells, expected at least 6")]
    MalformedRow {
        table: usize,
        row: usize,
        cells: usize,
    },

    #[error("cannot parse meeting time `{input}`: {source}")]
    DateTime {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("agenda {url} has no generated content label")]
    MissingGeneratedContent { url: String },

    #[error("agenda {url} row {row} has no bill id")]
    MissingBillId { url: String, row: usize },

    #[error("link `{text}` on {url} has no href")]
    MissingHref { url: String, text: String },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl ScrapeError {
    /// Errors that end the scrape whatever the row failure policy says.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScrapeError::Sink(_) | ScrapeError::Selector(_))
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("writing event failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding event failed: {0}")]
    Encode(#[from] serde_json::Error),
}
