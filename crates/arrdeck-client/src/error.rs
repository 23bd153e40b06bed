//! Normalized error types for log backend operations.
//!
//! Transport-agnostic errors that hide HTTP/reqwest details and give the
//! view layer actionable categories. A request-level failure never clears
//! the display; the caller keeps the last-known-good window and surfaces
//! the error as a connection-status string.

use std::fmt;

/// Normalized error for log backend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogBackendError {
    /// The backend is unreachable or the connection failed mid-request.
    Unreachable { message: String },

    /// The request exceeded its time budget. Handled exactly like a
    /// network failure.
    Timeout { message: String },

    /// The backend answered with a non-success HTTP status.
    BadStatus { status: u16 },

    /// The response body could not be parsed as the expected envelope.
    Payload { message: String },

    /// The backend answered `success: false`.
    Rejected { message: String },
}

impl fmt::Display for LogBackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable { message } => write!(f, "log backend unreachable: {message}"),
            Self::Timeout { message } => write!(f, "log request timed out: {message}"),
            Self::BadStatus { status } => write!(f, "log backend returned status {status}"),
            Self::Payload { message } => write!(f, "log response payload invalid: {message}"),
            Self::Rejected { message } => {
                if message.is_empty() {
                    write!(f, "log backend rejected the request")
                } else {
                    write!(f, "log backend rejected the request: {message}")
                }
            }
        }
    }
}

impl std::error::Error for LogBackendError {}

impl LogBackendError {
    /// Whether a later identical request could plausibly succeed
    /// (transient transport failures and server-side hiccups).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unreachable { .. } | Self::Timeout { .. } => true,
            Self::BadStatus { status } => *status >= 500,
            Self::Payload { .. } | Self::Rejected { .. } => false,
        }
    }
}

/// Error surface for the view operations exposed to the host UI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    OutOfRange(#[from] arrdeck_logs::PageOutOfRange),

    #[error(transparent)]
    Backend(#[from] LogBackendError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
