//! Shared tracing setup for the `capitol` binary and integration tests.
//!
//! [`init_logging`] installs one global subscriber. Events always go to
//! `stderr` (so JSON event output on `stdout` stays clean) and can be mirrored
//! into a daily rolling file. Later calls are no-ops.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static INITIALISED: OnceLock<Option<PathBuf>> = OnceLock::new();

const LOG_DIR_ENV: &str = "CAPITOL_LOG_DIR";

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Component name, used for the log file name and default directory.
    pub app_name: &'static str,
    /// Mirror events into a daily rolling file.
    pub to_file: bool,
    /// Explicit log directory. Falls back to `CAPITOL_LOG_DIR`, then the
    /// platform data directory.
    pub log_dir: Option<PathBuf>,
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "capitol",
            to_file: false,
            log_dir: None,
            format: LogFormat::Text,
            default_filter: "info".to_string(),
        }
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Returns the path of today's log file when file output is enabled.
pub fn init_logging(config: LogConfig) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = INITIALISED.get() {
        return Ok(path.clone());
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let stderr_layer = match config.format {
        LogFormat::Text => fmt::layer().with_writer(std::io::stderr).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    };

    let (file_layer, file_path) = if config.to_file {
        let dir = resolve_log_dir(config.app_name, config.log_dir.as_deref());
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

        let file_name = format!("{}.log", config.app_name);
        let today = Local::now().format("%Y-%m-%d").to_string();
        let path = dir.join(format!("{file_name}.{today}"));

        let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, &file_name));
        let _ = LOG_GUARD.set(guard);

        let layer = match config.format {
            LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
        };
        (Some(layer), Some(path))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = INITIALISED.set(file_path.clone());
    Ok(file_path)
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return expand_home(dir);
    }

    if let Ok(env_dir) = std::env::var(LOG_DIR_ENV) {
        return expand_home(Path::new(&env_dir));
    }

    dirs::data_local_dir()
        .map(|d| d.join(app_name))
        .unwrap_or_else(|| PathBuf::from(".").join(app_name))
}

fn expand_home(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
