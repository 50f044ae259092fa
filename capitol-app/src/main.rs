use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use capitol_common::observability::init_logging;
use capitol_common::Chamber;
use capitol_config::{CapitolConfig, CapitolConfigLoader};
use capitol_events::{EventScraper, JsonLinesSink, ScrapeReport};
use capitol_http::Url;
use clap::{Parser, Subcommand};

mod wiring;

#[derive(Debug, Parser)]
#[command(
    name = "capitol",
    version,
    about = "Committee meetings from the legislature's weekly calendar"
)]
struct Cli {
    /// YAML config file; skipped when missing.
    #[arg(long, global = true, env = "CAPITOL_CONFIG", default_value = "capitol.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scrape the weekly calendar and write one JSON event per line.
    Scrape {
        /// Chamber to scrape (upper, lower, other); repeatable. Defaults to `chambers` from config.
        #[arg(long = "chamber")]
        chambers: Vec<Chamber>,
        /// Session stamped on every event. Defaults to `session` from config.
        #[arg(long)]
        session: Option<String>,
        /// Write events here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Log and count bad rows instead of aborting.
        #[arg(long)]
        isolate_rows: bool,
    },
    /// Fetch an agenda page and print whether it is a real agenda or a list.
    Classify { url: Url },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg: CapitolConfig = CapitolConfigLoader::new()
        .with_optional_file(&cli.config)
        .load()
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // 2) Logging from the config's logging section
    if let Some(path) = init_logging(wiring::log_config(&cfg.logging))? {
        tracing::info!(path=%path.display(), "logging.file");
    }

    match cli.command {
        Command::Scrape {
            chambers,
            session,
            output,
            isolate_rows,
        } => {
            let session = match session.or_else(|| cfg.session.clone()) {
                Some(s) => s,
                None => bail!("no session given: pass --session or set `session` in config"),
            };
            let chambers = if chambers.is_empty() {
                cfg.chambers.clone()
            } else {
                chambers
            };
            scrape(&cfg, &chambers, &session, output, isolate_rows).await
        }
        Command::Classify { url } => classify(&cfg, &url).await,
    }
}

async fn scrape(
    cfg: &CapitolConfig,
    chambers: &[Chamber],
    session: &str,
    output: Option<PathBuf>,
    isolate_rows: bool,
) -> Result<()> {
    let fetcher = wiring::http_client(&cfg.http)?;
    let settings = wiring::scrape_settings(cfg, isolate_rows)?;
    let scraper = EventScraper::new(fetcher, settings);
    let mut sink = JsonLinesSink::new(wiring::open_output(output.as_deref())?);

    let mut total = ScrapeReport::default();
    for &chamber in chambers {
        let report = scraper
            .scrape(chamber, session, &mut sink)
            .await
            .with_context(|| format!("scraping {chamber} calendar"))?;
        tracing::info!(%chamber, report=%serde_json::to_string(&report)?, "scrape.chamber_done");
        total.tables += report.tables;
        total.emitted += report.emitted;
        total.skipped_spacer += report.skipped_spacer;
        total.skipped_chamber += report.skipped_chamber;
        total.failed += report.failed;
    }

    tracing::info!(
        session,
        chambers = chambers.len(),
        written = sink.written(),
        emitted = total.emitted,
        skipped_chamber = total.skipped_chamber,
        failed = total.failed,
        "scrape.summary"
    );
    Ok(())
}

async fn classify(cfg: &CapitolConfig, url: &Url) -> Result<()> {
    let fetcher = wiring::http_client(&cfg.http)?;
    let scraper = EventScraper::new(fetcher, wiring::scrape_settings(cfg, false)?);
    let shape = scraper
        .classify(url)
        .await
        .with_context(|| format!("classifying {url}"))?;
    println!("{}", shape.as_str());
    Ok(())
}
