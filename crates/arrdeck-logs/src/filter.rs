//! Level selection and the display-only view filter.
//!
//! Changing the level is a server-side re-scope (the totals and page
//! boundaries differ per level), so [`LevelSelection`] carries the query
//! value for the fetch. The [`ViewFilter`] half is purely client-side: it
//! decides visibility over the window snapshot and never mutates it.

use crate::record::{LogLevel, LogRecord};

// ---------------------------------------------------------------------------
// LevelSelection
// ---------------------------------------------------------------------------

/// Which levels the view is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelSelection {
    /// The identity filter: no server-side level parameter.
    #[default]
    All,
    Only(LogLevel),
}

impl LevelSelection {
    /// Parse a UI token. Anything unrecognized falls back to `All`.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "debug" => Self::Only(LogLevel::Debug),
            "info" => Self::Only(LogLevel::Info),
            "warning" | "warn" => Self::Only(LogLevel::Warning),
            "error" => Self::Only(LogLevel::Error),
            "fatal" | "critical" => Self::Only(LogLevel::Fatal),
            _ => Self::All,
        }
    }

    /// Value for the `level` query parameter; `None` for `All`.
    #[must_use]
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Only(level) => Some(level.filter_class().query_value()),
        }
    }

    /// Whether a record of `level` belongs under this selection.
    /// Comparison is by filter class, so the error selection admits FATAL.
    #[must_use]
    pub fn admits(&self, level: LogLevel) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => level.filter_class() == selected.filter_class(),
        }
    }
}

impl std::fmt::Display for LevelSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(level) => f.write_str(level.query_value()),
        }
    }
}

// ---------------------------------------------------------------------------
// ViewFilter
// ---------------------------------------------------------------------------

/// Display-only transform over the window: level visibility plus free-text
/// search. Mutates nothing; the window stays intact underneath.
#[derive(Debug, Clone, Default)]
pub struct ViewFilter {
    pub level: LevelSelection,
    /// Empty string means no active search.
    pub search_text: String,
}

impl ViewFilter {
    /// Whether the record should be shown under the current filter.
    /// Search matches case-insensitively against the message text, the
    /// same scope the highlighter marks, so visibility and match counts
    /// agree.
    #[must_use]
    pub fn is_visible(&self, record: &LogRecord) -> bool {
        if !self.level.admits(record.level) {
            return false;
        }
        if self.search_text.is_empty() {
            return true;
        }
        let needle = self.search_text.to_lowercase();
        record.message.to_lowercase().contains(&needle)
    }

    #[must_use]
    pub fn has_search(&self) -> bool {
        !self.search_text.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
