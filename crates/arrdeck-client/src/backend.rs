//! The log backend interface: the primary abstraction over the log store
//! collaborator.
//!
//! Implementations can run against the dashboard's REST endpoint
//! (`HttpLogBackend`) or be scripted for testing (`MockLogBackend` in
//! `mock.rs`). All operations are async and bounded by a caller-supplied
//! timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::LogBackendError;

/// Default per-request time budget.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One fetch against `GET /logs/{app}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    /// App tag whose log is being read.
    pub app: String,
    /// Maximum number of lines to return.
    pub limit: usize,
    /// How many lines to skip from the top (newest-first).
    pub offset: usize,
    /// Server-side level scope; `None` fetches all levels.
    pub level: Option<String>,
}

/// A successfully fetched batch of raw lines.
///
/// `total` is present and authoritative only on navigation-class
/// requests; polls may omit it and callers must never trust it from one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBatch {
    pub lines: Vec<String>,
    pub total: Option<usize>,
}

/// Wire envelope for the logs endpoint.
#[derive(Debug, Deserialize)]
struct LogsEnvelope {
    success: bool,
    #[serde(default)]
    logs: Vec<String>,
    #[serde(default)]
    total: Option<usize>,
    #[serde(default)]
    error: Option<String>,
}

// ---------------------------------------------------------------------------
// LogBackend trait
// ---------------------------------------------------------------------------

/// The log store interface.
#[async_trait]
pub trait LogBackend: Send + Sync {
    /// Fetch a batch of raw log lines. Implementations must bound the
    /// request with a timeout and normalize transport failures into
    /// [`LogBackendError`].
    async fn fetch_logs(&self, query: &LogQuery) -> Result<LogBatch, LogBackendError>;
}

// ---------------------------------------------------------------------------
// HttpLogBackend
// ---------------------------------------------------------------------------

/// REST implementation against the dashboard backend.
pub struct HttpLogBackend {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpLogBackend {
    /// Build a backend client for `base_url` (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Result<Self, LogBackendError> {
        Self::with_timeout(base_url, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LogBackendError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| LogBackendError::Unreachable {
                message: format!("failed to build http client: {err}"),
            })?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    fn logs_url(&self, query: &LogQuery) -> String {
        let mut url = format!(
            "{}/logs/{}?limit={}&offset={}",
            self.base_url, query.app, query.limit, query.offset
        );
        if let Some(level) = &query.level {
            url.push_str("&level=");
            url.push_str(level);
        }
        url
    }
}

#[async_trait]
impl LogBackend for HttpLogBackend {
    async fn fetch_logs(&self, query: &LogQuery) -> Result<LogBatch, LogBackendError> {
        let url = self.logs_url(query);
        tracing::debug!(%url, "fetching logs");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    LogBackendError::Timeout {
                        message: err.to_string(),
                    }
                } else {
                    LogBackendError::Unreachable {
                        message: err.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LogBackendError::BadStatus {
                status: status.as_u16(),
            });
        }

        let envelope: LogsEnvelope =
            response
                .json()
                .await
                .map_err(|err| LogBackendError::Payload {
                    message: err.to_string(),
                })?;

        if !envelope.success {
            return Err(LogBackendError::Rejected {
                message: envelope.error.unwrap_or_default(),
            });
        }

        Ok(LogBatch {
            lines: envelope.logs,
            total: envelope.total,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
