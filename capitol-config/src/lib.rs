//! Loader for scraper configuration with YAML + environment overlays.
//!
//! Sources are merged in order: optional YAML files, inline YAML snippets,
//! then `CAPITOL_`-prefixed environment variables (`__` separates nesting, so
//! `CAPITOL_CALENDAR__LIST_DEPTH=2` sets `calendar.list_depth`). String values
//! may reference `${VAR}`; expansion runs after the merge. Every field has a
//! default, so an empty configuration scrapes the Tennessee weekly calendar.
use capitol_common::observability::LogFormat;
use capitol_common::{Chamber, RowFailurePolicy};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_CALENDAR_URL: &str = "http://wapp.capitol.tn.gov/apps/schedule/WeeklyView.aspx";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CapitolConfig {
    /// Legislative session stamped on every event; the CLI may override it.
    #[serde(deserialize_with = "session_from_scalar")]
    pub session: Option<String>,
    /// Chambers scraped when the CLI does not name any.
    pub chambers: Vec<Chamber>,
    pub calendar: CalendarConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

impl Default for CapitolConfig {
    fn default() -> Self {
        Self {
            session: None,
            chambers: Chamber::ALL.to_vec(),
            calendar: CalendarConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub url: String,
    /// Agenda hrefs containing this go through page classification.
    pub main_marker: String,
    /// Agenda hrefs containing this are recorded directly as agenda documents.
    pub docs_marker: String,
    /// How many levels of agenda list pages are followed.
    pub list_depth: usize,
    pub row_failures: RowFailurePolicy,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CALENDAR_URL.to_string(),
            main_marker: "CalendarMain".to_string(),
            docs_marker: "scheduledocs".to_string(),
            list_depth: 1,
            row_failures: RowFailurePolicy::FailFast,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            connect_timeout_secs: 5,
            user_agent: concat!("capitol-scraper/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Default filter when `RUST_LOG` is unset.
    pub filter: String,
    pub dir: Option<String>,
    /// Mirror logs into a daily rolling file.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: "info".to_string(),
            dir: None,
            file: false,
        }
    }
}

// Sessions are usually numbers (`109`); YAML and env parsing hand those over
// as integers.
fn session_from_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "session must be a string or number, got {other}"
        ))),
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring.
pub struct CapitolConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for CapitolConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CapitolConfigLoader {
    /// Start from defaults; environment overrides are attached at [`load`](Self::load)
    /// so they always win over files.
    ///
    /// ```
    /// use capitol_config::CapitolConfigLoader;
    ///
    /// let cfg = CapitolConfigLoader::new()
    ///     .with_yaml_str("session: '109'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.session.as_deref(), Some("109"));
    /// assert_eq!(cfg.calendar.list_depth, 1);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet (tests and CLI overrides).
    ///
    /// ```
    /// use capitol_common::{Chamber, RowFailurePolicy};
    /// use capitol_config::CapitolConfigLoader;
    ///
    /// let cfg = CapitolConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// chambers: [upper]
    /// calendar:
    ///   row_failures: isolate
    ///   list_depth: 2
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.chambers, vec![Chamber::Upper]);
    /// assert_eq!(cfg.calendar.row_failures, RowFailurePolicy::Isolate);
    /// assert_eq!(cfg.calendar.main_marker, "CalendarMain");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders, and deserialize.
    pub fn load(self) -> Result<CapitolConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("CAPITOL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
