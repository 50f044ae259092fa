//! Minimal HTML page client with structured request logging.
//!
//! - One attempt per request; failures surface to the caller unchanged
//! - Per-request options: extra headers, query params, timeout
//! - Non-2xx responses become [`HttpError::Status`] with a body snippet
//! - Optional *raw* request/response logging via `CAPITOL_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), capitol_http::HttpError> {
//! let client = capitol_http::HttpClient::new()?;
//! let url = capitol_http::Url::parse("http://wapp.capitol.tn.gov/apps/schedule/WeeklyView.aspx")
//!     .map_err(|e| capitol_http::HttpError::Url(e.to_string()))?;
//! let html = client.get_text(&url, capitol_http::RequestOpts::default()).await?;
//! # let _ = html;
//! # Ok(()) }
//! ```
//!
//! Observability: `tracing` events are emitted for request start, response
//! status, body snippets (truncated) and final errors. Raw lines go to the
//! `http.raw` target.

use reqwest::header::{HeaderMap, USER_AGENT};
use reqwest::{Client, Method};
use std::borrow::Cow;
use std::env;
use std::time::Duration;
use thiserror::Error;

pub use reqwest::{StatusCode, Url};

const RAW_ENV: &str = "CAPITOL_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_LEN: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a curl command for reproducing a request; cookies are redacted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, val) in headers.iter() {
        let v = if name.as_str().eq_ignore_ascii_case("cookie") {
            "<redacted>".to_string()
        } else {
            val.to_str().unwrap_or("").to_string()
        };
        parts.push(format!(
            "-H '{}: {}'",
            name.as_str(),
            v.replace('\'', r"'\''")
        ));
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("client build failed: {0}")]
    Build(String),
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },
    #[error("{url} returned {status}: {snippet}")]
    Status {
        url: String,
        status: StatusCode,
        snippet: String,
    },
}

/// Per-request tuning knobs.
///
/// ```
/// use capitol_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     query: Some(vec![("week", "2015-01-05".into())]),
///     ..Default::default()
/// };
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Client with a 5s connect timeout and 15s request timeout.
    ///
    /// ```no_run
    /// use capitol_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new()?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new() -> Result<Self, HttpError> {
        Self::builder().build()
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// GET `url` and return the decoded body text.
    pub async fn get_text(&self, url: &Url, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let method = Method::GET;
        let mut rb = self.inner.request(method.clone(), url.clone());

        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        rb = rb.timeout(timeout);

        if let Some(q) = &opts.query {
            let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            rb = rb.query(&pairs);
        }
        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }

        let req_id = format!(
            "r{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            query=?url.query(),
            timeout_ms=timeout.as_millis() as u64,
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(&method, url, opts.headers.as_ref().unwrap_or(&HeaderMap::new()));
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.send");
            HttpError::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        })?;
        let status = resp.status();
        let final_url = resp.url().clone();
        let body = resp.text().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.body");
            HttpError::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=body.len(),
            redirected=%(final_url != *url),
            "http.response"
        );

        if raw_enabled() {
            let mut text = body.as_str();
            let truncated = text.len() > RAW_MAX_BODY;
            if truncated {
                text = truncate_at_char(text, RAW_MAX_BODY);
            }
            tracing::info!(
                target: "http.raw",
                %req_id,
                %status,
                duration_ms = dur_ms,
                body = %text,
                truncated
            );
        }

        if status.is_success() {
            return Ok(body);
        }

        let snippet = snip_body(&body);
        tracing::warn!(req_id=%req_id, %status, body_snippet=%snippet, "http.error");
        Err(HttpError::Status {
            url: url.to_string(),
            status,
            snippet,
        })
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientBuilder {
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(5),
            user_agent: concat!("capitol-http/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = dur;
        self
    }

    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = dur;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn build(self) -> Result<HttpClient, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            self.user_agent
                .parse()
                .map_err(|e| HttpError::Build(format!("invalid user agent: {e}")))?,
        );
        let inner = Client::builder()
            .connect_timeout(self.connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(HttpClient {
            inner,
            default_timeout: self.timeout,
        })
    }
}

fn truncate_at_char(s: &str, max: usize) -> &str {
    let mut end = max.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn snip_body(body: &str) -> String {
    if body.len() > SNIPPET_LEN {
        format!("{}...", truncate_at_char(body, SNIPPET_LEN))
    } else {
        body.to_string()
    }
}
