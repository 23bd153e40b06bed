//! View events surfaced to the host UI.
//!
//! The subsystem owns no rendering; connection-status transitions and
//! batch diagnostics are reported through a sink trait the host wires up
//! (a status badge, a toast, a debug console). The default sink drops
//! everything.

use crate::token::FetchClass;

/// Reachability of the log backend as observed by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connected,
    Disconnected,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected => f.write_str("connected"),
            Self::Disconnected => f.write_str("disconnected"),
        }
    }
}

/// An event emitted by the log view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The backend became reachable/unreachable. `detail` carries the
    /// error's status line when disconnecting.
    Status {
        status: ConnectionStatus,
        detail: String,
    },

    /// A fetched batch was decoded. `dropped` counts malformed lines that
    /// were skipped without aborting the batch.
    BatchDecoded { kept: usize, dropped: usize },

    /// A response arrived under a superseded token and was discarded.
    StaleResponse { class: FetchClass },

    /// A navigation batch arrived out of order and the window was
    /// repaired by sorting.
    WindowRepaired,
}

impl std::fmt::Display for ViewEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status { status, detail } => {
                if detail.is_empty() {
                    write!(f, "status: {status}")
                } else {
                    write!(f, "status: {status} ({detail})")
                }
            }
            Self::BatchDecoded { kept, dropped } => {
                write!(f, "batch decoded: kept {kept}, dropped {dropped}")
            }
            Self::StaleResponse { class } => write!(f, "stale {class} response discarded"),
            Self::WindowRepaired => f.write_str("window order repaired"),
        }
    }
}

/// Trait for sinks that receive view events.
pub trait ViewEventSink: Send + Sync {
    fn record(&self, event: ViewEvent);
}

/// The default sink: drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl ViewEventSink for NoopEventSink {
    fn record(&self, _event: ViewEvent) {}
}

/// In-memory sink for tests.
#[derive(Default)]
pub struct InMemoryEventSink {
    events: std::sync::Mutex<Vec<ViewEvent>>,
}

impl InMemoryEventSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in order.
    #[must_use]
    pub fn events(&self) -> Vec<ViewEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ViewEventSink for InMemoryEventSink {
    fn record(&self, event: ViewEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
