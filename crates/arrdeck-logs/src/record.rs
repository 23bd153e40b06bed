//! Structured log records and severity levels.
//!
//! The server renders one record per line; after decoding, records are
//! immutable. Two fetches of the same underlying entry compare equal by
//! identity key, so the window can recognize it as the same record.

use chrono::NaiveDateTime;

/// Source tag used when the server omits one.
pub const DEFAULT_SOURCE: &str = "SYSTEM";

// ---------------------------------------------------------------------------
// LogLevel
// ---------------------------------------------------------------------------

/// Severity of a single log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    /// Fatal/critical entries keep their own badge but filter as [`LogLevel::Error`].
    Fatal,
}

impl LogLevel {
    /// Parse a server level token. Unknown tokens map to `Info`;
    /// `fatal` and `critical` map to `Fatal`.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "debug" => Self::Debug,
            "warning" | "warn" => Self::Warning,
            "error" => Self::Error,
            "fatal" | "critical" => Self::Fatal,
            _ => Self::Info,
        }
    }

    /// Display badge for the record row.
    #[must_use]
    pub fn badge(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// The level this record filters under. Fatal entries are surfaced by
    /// the error filter; every other level filters as itself.
    #[must_use]
    pub fn filter_class(self) -> Self {
        match self {
            Self::Fatal => Self::Error,
            other => other,
        }
    }

    /// Lowercase value used in server query parameters.
    #[must_use]
    pub fn query_value(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.badge())
    }
}

// ---------------------------------------------------------------------------
// LogRecord
// ---------------------------------------------------------------------------

/// One decoded log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Server-localized timestamp (timezone math already applied upstream).
    pub timestamp: NaiveDateTime,
    pub level: LogLevel,
    /// Originating app tag, `SYSTEM` when the server leaves it blank.
    pub source: String,
    pub message: String,
}

impl LogRecord {
    /// Identity key for de-duplication. The server assigns no record ids,
    /// so `(timestamp, message)` is the unit of identity: fetching the
    /// same pair again means the same record, not a new one.
    #[must_use]
    pub fn identity(&self) -> RecordKey {
        RecordKey {
            timestamp: self.timestamp,
            message: self.message.clone(),
        }
    }
}

/// De-duplication key for a [`LogRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub timestamp: NaiveDateTime,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_levels() {
        assert_eq!(LogLevel::parse("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::parse("INFO"), LogLevel::Info);
        assert_eq!(LogLevel::parse("Warning"), LogLevel::Warning);
        assert_eq!(LogLevel::parse("warn"), LogLevel::Warning);
        assert_eq!(LogLevel::parse("error"), LogLevel::Error);
    }

    #[test]
    fn parse_unknown_level_is_info() {
        assert_eq!(LogLevel::parse("trace"), LogLevel::Info);
        assert_eq!(LogLevel::parse(""), LogLevel::Info);
        assert_eq!(LogLevel::parse("verbose"), LogLevel::Info);
    }

    #[test]
    fn fatal_and_critical_keep_badge_but_filter_as_error() {
        for token in ["fatal", "critical", "FATAL", "Critical"] {
            let level = LogLevel::parse(token);
            assert_eq!(level, LogLevel::Fatal, "token {token:?}");
            assert_eq!(level.badge(), "FATAL");
            assert_eq!(level.filter_class(), LogLevel::Error);
        }
    }

    #[test]
    fn non_fatal_levels_filter_as_themselves() {
        for level in [
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Error,
        ] {
            assert_eq!(level.filter_class(), level);
        }
    }

    #[test]
    fn identity_key_ignores_level_and_source() {
        let ts = chrono::NaiveDateTime::parse_from_str("2024-01-01 10:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let a = LogRecord {
            timestamp: ts,
            level: LogLevel::Info,
            source: "sonarr".into(),
            message: "Starting scan".into(),
        };
        let b = LogRecord {
            timestamp: ts,
            level: LogLevel::Warning,
            source: "radarr".into(),
            message: "Starting scan".into(),
        };
        assert_eq!(a.identity(), b.identity());
    }
}
