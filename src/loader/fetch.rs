use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use super::url::alternate_filename;
use super::LoadDiagnostics;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] Box<ureq::Error>),

    #[error("Failed to read response body: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("network error: {0}")]
    Network(#[from] RequestError),

    #[error("malformed response: server returned HTTP {status}")]
    Status { status: u16 },

    #[error("malformed response: empty body")]
    EmptyBody,

    #[error("malformed response: body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema error: {0}")]
    Schema(String),
}

/// Status and body of a completed HTTP exchange, whatever the status code.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

/// One GET per call. Error statuses come back as `Ok` responses; only
/// transport and read failures are errors.
pub trait Fetch {
    fn get(&self, url: &str) -> Result<Response, RequestError>;
}

pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<Response, RequestError> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                return Ok(Response {
                    status: code,
                    body: response.into_string().unwrap_or_default(),
                })
            }
            Err(other) => return Err(RequestError::HttpError(Box::new(other))),
        };

        let status = response.status();
        let body = response.into_string()?;
        Ok(Response { status, body })
    }
}

fn fetch_json<F: Fetch + ?Sized>(fetcher: &F, url: &str) -> Result<Value, LoadError> {
    let response = fetcher.get(url)?;
    if response.status != 200 {
        return Err(LoadError::Status {
            status: response.status,
        });
    }

    let body = response.body.trim();
    if body.is_empty() {
        return Err(LoadError::EmptyBody);
    }

    Ok(serde_json::from_str(body)?)
}

/// Tries `url`, then its alternate filename once. Every attempt lands in the
/// diagnostics; the first JSON document that comes back wins.
pub fn fetch_candidate<F: Fetch + ?Sized>(
    fetcher: &F,
    url: &str,
    diagnostics: &mut LoadDiagnostics,
) -> Option<Value> {
    let alternate = alternate_filename(url);
    let attempts = std::iter::once(url.to_string()).chain(alternate);

    for attempt in attempts {
        log::debug!("fetching quiz items from {}", attempt);
        diagnostics.attempted_urls.push(attempt.clone());

        match fetch_json(fetcher, &attempt) {
            Ok(value) => {
                diagnostics.resolved_source = Some(attempt);
                return Some(value);
            }
            Err(e) => {
                log::warn!("could not load {}: {}", attempt, e);
                diagnostics.last_error = Some(e.to_string());
            }
        }
    }

    None
}
