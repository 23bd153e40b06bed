//! Mock log backend for unit and integration testing.
//!
//! Records every query it receives and replays a scripted sequence of
//! responses, with an optional per-call delay to exercise slow-response
//! races.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::{LogBackend, LogBatch, LogQuery};
use crate::error::LogBackendError;

/// Scripted mock implementation of [`LogBackend`].
///
/// Responses queue up in order; once the script is exhausted the mock
/// answers with an empty successful batch (`total: Some(0)`).
#[derive(Default)]
pub struct MockLogBackend {
    responses: Mutex<VecDeque<Result<LogBatch, LogBackendError>>>,
    calls: Mutex<Vec<LogQuery>>,
    delay: Mutex<Option<Duration>>,
}

impl MockLogBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful batch.
    #[must_use]
    pub fn with_batch(self, lines: Vec<String>, total: Option<usize>) -> Self {
        self.push_response(Ok(LogBatch { lines, total }));
        self
    }

    /// Queue an error response.
    #[must_use]
    pub fn with_error(self, err: LogBackendError) -> Self {
        self.push_response(Err(err));
        self
    }

    /// Sleep this long before answering each call.
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        match self.delay.lock() {
            Ok(mut guard) => *guard = Some(delay),
            Err(poisoned) => *poisoned.into_inner() = Some(delay),
        }
        self
    }

    /// Queue a response after construction.
    pub fn push_response(&self, response: Result<LogBatch, LogBackendError>) {
        match self.responses.lock() {
            Ok(mut guard) => guard.push_back(response),
            Err(poisoned) => poisoned.into_inner().push_back(response),
        }
    }

    /// All recorded queries, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<LogQuery> {
        match self.calls.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        match self.calls.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn next_response(&self) -> Result<LogBatch, LogBackendError> {
        let queued = match self.responses.lock() {
            Ok(mut guard) => guard.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        queued.unwrap_or(Ok(LogBatch {
            lines: Vec::new(),
            total: Some(0),
        }))
    }
}

#[async_trait]
impl LogBackend for MockLogBackend {
    async fn fetch_logs(&self, query: &LogQuery) -> Result<LogBatch, LogBackendError> {
        match self.calls.lock() {
            Ok(mut guard) => guard.push(query.clone()),
            Err(poisoned) => poisoned.into_inner().push(query.clone()),
        }
        let delay = match self.delay.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.next_response()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
