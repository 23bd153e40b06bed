//! arrdeck-client: the async half of the arrdeck log subsystem.
//!
//! Fetches paginated log batches from the dashboard backend, keeps a
//! [`LogViewController`] per panel in sync through poll merges and
//! navigation replacements, and guards against response races with
//! monotonic fetch tokens. The pure engine (decoding, window ordering,
//! pagination math, search) lives in `arrdeck-logs`.

pub mod backend;
pub mod controller;
pub mod error;
pub mod event;
pub mod mock;
pub mod runtime;
pub mod settings;
pub mod token;

pub use backend::{HttpLogBackend, LogBackend, LogBatch, LogQuery, DEFAULT_FETCH_TIMEOUT};
pub use controller::{
    LogViewController, NavApplied, PageSummary, PollOutcome, RenderPlan, RenderRow,
    SearchSummary, POLL_LIMIT,
};
pub use error::{LogBackendError, ViewError};
pub use event::{ConnectionStatus, InMemoryEventSink, NoopEventSink, ViewEvent, ViewEventSink};
pub use mock::MockLogBackend;
pub use runtime::{spawn_view, spawn_view_with_settings, LogViewHandle, ViewCommand};
pub use settings::{
    refresh_interval_or_default, GeneralSettings, HttpSettingsProvider, SettingsError,
    SettingsProvider, StaticSettings, DEFAULT_REFRESH_INTERVAL,
};
pub use token::{FetchClass, FetchToken, TokenLedger};
