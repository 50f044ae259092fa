use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use capitol_common::observability::LogConfig;
use capitol_common::RowFailurePolicy;
use capitol_config::{CapitolConfig, HttpConfig, LoggingConfig};
use capitol_events::{AgendaMarkers, ScrapeSettings};
use capitol_http::{HttpClient, Url};

pub fn log_config(cfg: &LoggingConfig) -> LogConfig {
    LogConfig {
        app_name: "capitol",
        to_file: cfg.file,
        log_dir: cfg.dir.as_ref().map(PathBuf::from),
        format: cfg.format,
        default_filter: cfg.filter.clone(),
    }
}

pub fn http_client(cfg: &HttpConfig) -> Result<HttpClient> {
    HttpClient::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .user_agent(cfg.user_agent.clone())
        .build()
        .context("building http client")
}

/// `isolate_rows` forces [`RowFailurePolicy::Isolate`] over the configured policy.
pub fn scrape_settings(cfg: &CapitolConfig, isolate_rows: bool) -> Result<ScrapeSettings> {
    let cal = &cfg.calendar;
    let calendar_url = Url::parse(&cal.url)
        .with_context(|| format!("calendar.url is not a valid url: {}", cal.url))?;

    let mut settings = ScrapeSettings::new(calendar_url);
    settings.markers = AgendaMarkers {
        calendar_main: cal.main_marker.clone(),
        schedule_docs: cal.docs_marker.clone(),
    };
    settings.list_depth = cal.list_depth;
    settings.row_failures = if isolate_rows {
        RowFailurePolicy::Isolate
    } else {
        cal.row_failures
    };
    Ok(settings)
}

/// Where JSON lines go: the given file, or stdout.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("creating output file {}", p.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
