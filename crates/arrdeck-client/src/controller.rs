//! The log view controller: one instance per log panel.
//!
//! Owns the window, pagination, filter, and token ledger for a single
//! view, and exposes the operations the host UI calls. The token
//! mint/apply split (`begin_*` / `apply_*`) keeps every state mutation in
//! one synchronous step: the async operations are thin wrappers that
//! fetch between the two halves, and a response carrying a superseded
//! token is discarded without touching state.

use std::sync::Arc;

use arrdeck_logs::pagination::PaginationState;
use arrdeck_logs::record::LogRecord;
use arrdeck_logs::search::{DisplayLine, SearchHighlighter, SearchMatches};
use arrdeck_logs::timestamp::TIMESTAMP_FORMAT;
use arrdeck_logs::window::LogWindowStore;
use arrdeck_logs::{decode, LevelSelection, ViewFilter};

use crate::backend::{LogBackend, LogBatch, LogQuery};
use crate::error::{LogBackendError, ViewError};
use crate::event::{ConnectionStatus, NoopEventSink, ViewEvent, ViewEventSink};
use crate::token::{FetchClass, FetchToken, TokenLedger};

/// How many of the newest records a poll asks for, independent of the
/// page size.
pub const POLL_LIMIT: usize = 50;

// ---------------------------------------------------------------------------
// Apply outcomes
// ---------------------------------------------------------------------------

/// What applying a navigation response did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavApplied {
    /// Window replaced and page committed. `refetch` carries the clamped
    /// page when the dataset shrank under the request and one repair
    /// fetch is needed.
    Applied { refetch: Option<usize> },
    /// Superseded token; state untouched.
    Stale,
    /// Fetch failed; last-known-good window and pagination retained.
    Failed(LogBackendError),
}

/// What a poll cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Not on page 1; no fetch was issued.
    Skipped,
    /// Batch merged; `inserted` counts records actually added.
    Merged { inserted: usize },
    /// Superseded token; state untouched.
    Stale,
    /// Fetch failed; window retained, status flipped to disconnected.
    Failed(LogBackendError),
}

// ---------------------------------------------------------------------------
// Render plan
// ---------------------------------------------------------------------------

/// Pagination summary for the UI chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_records: usize,
    pub page_size: usize,
    /// Affordance flags so prev/next controls are disabled up front
    /// instead of leaning on the bounds rejection.
    pub has_prev: bool,
    pub has_next: bool,
}

/// Active search summary for the UI chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSummary {
    pub query: String,
    pub match_count: usize,
    pub highlighted: usize,
}

/// One visible record row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRow {
    pub timestamp: String,
    pub badge: &'static str,
    pub source: String,
    /// Message text, possibly carrying highlight markers.
    pub message: String,
}

/// Everything the host needs to render the view. Pure data; building it
/// mutates nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    pub rows: Vec<RenderRow>,
    pub page: PageSummary,
    pub status: ConnectionStatus,
    pub search: Option<SearchSummary>,
}

// ---------------------------------------------------------------------------
// LogViewController
// ---------------------------------------------------------------------------

/// State and operations for one log view.
pub struct LogViewController {
    backend: Arc<dyn LogBackend>,
    sink: Arc<dyn ViewEventSink>,
    app: String,
    window: LogWindowStore,
    pagination: PaginationState,
    filter: ViewFilter,
    highlighter: SearchHighlighter,
    /// Display text per window record, same order as the snapshot.
    display: Vec<DisplayLine>,
    matches: SearchMatches,
    tokens: TokenLedger,
    status: ConnectionStatus,
    poll_limit: usize,
    fetching: bool,
}

impl LogViewController {
    pub fn new(backend: Arc<dyn LogBackend>, app: impl Into<String>) -> Self {
        Self {
            backend,
            sink: Arc::new(NoopEventSink),
            app: app.into(),
            window: LogWindowStore::new(),
            pagination: PaginationState::default(),
            filter: ViewFilter::default(),
            highlighter: SearchHighlighter::new(),
            display: Vec::new(),
            matches: SearchMatches::default(),
            tokens: TokenLedger::new(),
            status: ConnectionStatus::Connected,
            poll_limit: POLL_LIMIT,
            fetching: false,
        }
    }

    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn ViewEventSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.pagination = PaginationState::new(size);
        self
    }

    #[must_use]
    pub fn with_poll_limit(mut self, limit: usize) -> Self {
        self.poll_limit = limit.max(1);
        self
    }

    #[must_use]
    pub fn with_highlighter(mut self, highlighter: SearchHighlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    // -- accessors --

    #[must_use]
    pub fn app(&self) -> &str {
        &self.app
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    #[must_use]
    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    #[must_use]
    pub fn level(&self) -> LevelSelection {
        self.filter.level
    }

    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.filter.search_text
    }

    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    /// The raw window contents, newest first.
    #[must_use]
    pub fn snapshot(&self) -> &[LogRecord] {
        self.window.snapshot()
    }

    // -- operations exposed to the host UI --

    /// First fetch: page 1 of the current app.
    pub async fn init(&mut self) -> Result<(), ViewError> {
        self.run_nav(1).await
    }

    /// Switch to another app's log. Resets pagination to page 1 and
    /// rebuilds the window from scratch; the level and search selections
    /// carry over and re-apply to the new window.
    pub async fn handle_app_change(&mut self, app: impl Into<String>) -> Result<(), ViewError> {
        self.app = app.into();
        self.pagination.reset();
        self.window.clear();
        self.rebuild_display();
        self.run_nav(1).await
    }

    /// Change the level scope. Not a client-side toggle: totals and page
    /// boundaries differ per level, so this resets to page 1 and re-issues
    /// a navigation fetch scoped server-side. Switching back to `All`
    /// re-fetches too, since intervening polls may have changed the dataset.
    pub async fn handle_level_change(
        &mut self,
        selection: LevelSelection,
    ) -> Result<(), ViewError> {
        self.filter.level = selection;
        self.pagination.reset();
        self.run_nav(1).await
    }

    /// Navigate to a page. Out-of-range requests are rejected before any
    /// fetch is issued.
    pub async fn goto(&mut self, page: usize) -> Result<(), ViewError> {
        self.pagination.validate_page(page)?;
        self.run_nav(page).await
    }

    /// Change the page size; resets to page 1 and re-fetches.
    pub async fn set_page_size(&mut self, size: usize) -> Result<(), ViewError> {
        self.pagination.set_page_size(size);
        self.run_nav(1).await
    }

    /// Run one poll cycle: fetch the newest records and merge them in.
    /// Only meaningful on page 1; elsewhere it is a no-op.
    pub async fn poll_once(&mut self) -> PollOutcome {
        let Some(token) = self.begin_poll() else {
            return PollOutcome::Skipped;
        };
        let query = self.poll_query();
        let outcome = self.backend.fetch_logs(&query).await;
        self.apply_poll(token, outcome)
    }

    /// Set the free-text search and highlight matches in place.
    pub fn search(&mut self, text: impl Into<String>) -> SearchSummary {
        self.filter.search_text = text.into();
        self.matches = self
            .highlighter
            .apply(&mut self.display, &self.filter.search_text);
        SearchSummary {
            query: self.filter.search_text.clone(),
            match_count: self.matches.match_count(),
            highlighted: self.matches.highlighted,
        }
    }

    /// Drop the search and restore pristine display content.
    pub fn clear_search(&mut self) {
        self.filter.search_text.clear();
        self.highlighter.clear(&mut self.display);
        self.matches = SearchMatches::default();
    }

    /// Invalidate any in-flight poll, e.g. when the view goes away.
    pub fn on_disconnect(&mut self) {
        self.tokens.invalidate(FetchClass::Poll);
    }

    /// Build the data the host renders from. Applies the view filter over
    /// the snapshot; the window itself stays untouched.
    #[must_use]
    pub fn render_plan(&self) -> RenderPlan {
        let rows = self
            .window
            .snapshot()
            .iter()
            .zip(self.display.iter())
            .filter(|(record, _)| self.filter.is_visible(record))
            .map(|(record, line)| RenderRow {
                timestamp: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                badge: record.level.badge(),
                source: record.source.clone(),
                message: line.text().to_owned(),
            })
            .collect();

        let search = if self.filter.has_search() {
            Some(SearchSummary {
                query: self.filter.search_text.clone(),
                match_count: self.matches.match_count(),
                highlighted: self.matches.highlighted,
            })
        } else {
            None
        };

        RenderPlan {
            rows,
            page: PageSummary {
                current_page: self.pagination.current_page(),
                total_pages: self.pagination.total_pages(),
                total_records: self.pagination.total_records(),
                page_size: self.pagination.page_size(),
                has_prev: self.pagination.has_prev(),
                has_next: self.pagination.has_next(),
            },
            status: self.status,
            search,
        }
    }

    // -- token mint / apply split --

    /// Mint a navigation token, superseding any in-flight navigation.
    pub fn begin_nav(&mut self) -> FetchToken {
        self.fetching = true;
        self.tokens.issue(FetchClass::Nav)
    }

    /// Query for a navigation fetch of `page` under the current scope.
    #[must_use]
    pub fn nav_query(&self, page: usize) -> LogQuery {
        LogQuery {
            app: self.app.clone(),
            limit: self.pagination.page_size(),
            offset: self.pagination.offset_for(page),
            level: self.filter.level.query_value().map(str::to_owned),
        }
    }

    /// Apply a navigation response in one synchronous step.
    ///
    /// The committed page and the server total both come from this
    /// response; a failed fetch leaves the previous page on display
    /// rather than moving the UI to a page with no data.
    pub fn apply_nav(
        &mut self,
        token: FetchToken,
        page: usize,
        outcome: Result<LogBatch, LogBackendError>,
    ) -> NavApplied {
        if !self.tokens.is_current(token) {
            self.sink.record(ViewEvent::StaleResponse {
                class: FetchClass::Nav,
            });
            return NavApplied::Stale;
        }
        self.fetching = false;

        let batch = match outcome {
            Ok(batch) => batch,
            Err(err) => {
                self.set_status(ConnectionStatus::Disconnected, err.to_string());
                return NavApplied::Failed(err);
            }
        };

        let records = self.decode_batch(&batch.lines);
        self.window.replace(records);
        self.pagination.commit_page(page);
        let refetch = match batch.total {
            Some(total) => self.pagination.apply_server_totals(total),
            None => None,
        };
        self.rebuild_display();
        self.set_status(ConnectionStatus::Connected, String::new());
        NavApplied::Applied { refetch }
    }

    /// Mint a poll token, or `None` when polling is not valid (any page
    /// other than 1).
    pub fn begin_poll(&mut self) -> Option<FetchToken> {
        if self.pagination.current_page() != 1 {
            return None;
        }
        Some(self.tokens.issue(FetchClass::Poll))
    }

    /// Query for one poll: the newest records under the current scope.
    #[must_use]
    pub fn poll_query(&self) -> LogQuery {
        LogQuery {
            app: self.app.clone(),
            limit: self.poll_limit,
            offset: 0,
            level: self.filter.level.query_value().map(str::to_owned),
        }
    }

    /// Apply a poll response in one synchronous step.
    ///
    /// Polls only ever add: the batch merges into the window, and the
    /// server total (authoritative on navigation responses alone) is
    /// ignored here, so the visible page count never jumps mid-poll.
    pub fn apply_poll(
        &mut self,
        token: FetchToken,
        outcome: Result<LogBatch, LogBackendError>,
    ) -> PollOutcome {
        if !self.tokens.is_current(token) {
            self.sink.record(ViewEvent::StaleResponse {
                class: FetchClass::Poll,
            });
            return PollOutcome::Stale;
        }

        let batch = match outcome {
            Ok(batch) => batch,
            Err(err) => {
                self.set_status(ConnectionStatus::Disconnected, err.to_string());
                return PollOutcome::Failed(err);
            }
        };

        let records = self.decode_batch(&batch.lines);
        let inserted = self.window.merge_new(records);
        if inserted > 0 {
            self.rebuild_display();
        }
        self.set_status(ConnectionStatus::Connected, String::new());
        PollOutcome::Merged { inserted }
    }

    // -- internals --

    async fn run_nav(&mut self, page: usize) -> Result<(), ViewError> {
        let token = self.begin_nav();
        let query = self.nav_query(page);
        let outcome = self.backend.fetch_logs(&query).await;
        match self.apply_nav(token, page, outcome) {
            NavApplied::Applied {
                refetch: Some(clamped),
            } => {
                // The dataset shrank under the request; fetch the clamped
                // page once. A second shrink waits for the next user
                // interaction or poll.
                let token = self.begin_nav();
                let query = self.nav_query(clamped);
                let outcome = self.backend.fetch_logs(&query).await;
                match self.apply_nav(token, clamped, outcome) {
                    NavApplied::Failed(err) => Err(ViewError::Backend(err)),
                    _ => Ok(()),
                }
            }
            NavApplied::Applied { refetch: None } | NavApplied::Stale => Ok(()),
            NavApplied::Failed(err) => Err(ViewError::Backend(err)),
        }
    }

    /// Decode a batch of raw lines, dropping malformed ones. A bad line
    /// never aborts its batch.
    fn decode_batch(&self, lines: &[String]) -> Vec<LogRecord> {
        let mut records = Vec::with_capacity(lines.len());
        let mut dropped = 0usize;
        for line in lines {
            match decode(line) {
                Ok(record) => records.push(record),
                Err(err) => {
                    dropped += 1;
                    tracing::debug!(%err, line = line.as_str(), "dropped undecodable line");
                }
            }
        }
        self.sink.record(ViewEvent::BatchDecoded {
            kept: records.len(),
            dropped,
        });
        records
    }

    /// Rebuild display lines from the window and re-apply any active
    /// search. The pristine cache is rebuilt with the window, so clearing
    /// the search still restores exact content.
    fn rebuild_display(&mut self) {
        self.display = self
            .window
            .snapshot()
            .iter()
            .map(|record| DisplayLine::new(record.message.clone()))
            .collect();
        self.matches = self
            .highlighter
            .apply(&mut self.display, &self.filter.search_text);
    }

    fn set_status(&mut self, status: ConnectionStatus, detail: String) {
        if self.status != status {
            self.status = status;
            self.sink.record(ViewEvent::Status { status, detail });
        }
    }
}
