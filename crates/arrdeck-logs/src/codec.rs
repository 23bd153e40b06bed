//! Decoding raw server log lines into structured records.
//!
//! The server renders `timestamp|level|source|message`, optionally behind a
//! bracketed prefix. Decoding is pure; a rejected line never aborts the
//! batch it arrived in; callers drop it and keep going.

use crate::record::{LogLevel, LogRecord, DEFAULT_SOURCE};
use crate::timestamp::parse_timestamp;

/// Anything shorter cannot hold a timestamp plus the three delimiters.
const MIN_LINE_LEN: usize = 24;

/// How far into the line a bracketed prefix may close.
const MAX_PREFIX_SCAN: usize = 32;

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// Why a raw line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Too short to be a rendered record.
    TooShort,
    /// Not the `timestamp|level|source|message` delimiter shape.
    Shape,
    /// A fragment of a nested structured payload, not a record of its own.
    Fragment,
    /// First field failed timestamp validation.
    InvalidTimestamp,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::TooShort => "line too short",
            Self::Shape => "line does not match timestamp|level|source|message",
            Self::Fragment => "line is a fragment of a nested payload",
            Self::InvalidTimestamp => "invalid timestamp field",
        };
        f.write_str(s)
    }
}

impl std::error::Error for DecodeError {}

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

/// Decode one raw server line into a [`LogRecord`].
///
/// An optional leading `[...]` prefix is skipped. Unknown level tokens map
/// to INFO (see [`LogLevel::parse`]); an empty source becomes `SYSTEM`.
pub fn decode(line: &str) -> Result<LogRecord, DecodeError> {
    let trimmed = line.trim();
    if trimmed.len() < MIN_LINE_LEN {
        return Err(DecodeError::TooShort);
    }

    let body = strip_bracket_prefix(trimmed).trim_start();
    if body.len() < MIN_LINE_LEN {
        return Err(DecodeError::TooShort);
    }
    if is_structured_fragment(body) {
        return Err(DecodeError::Fragment);
    }

    let mut fields = body.splitn(4, '|');
    let (ts_field, level_field, source_field, message) = match (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) {
        (Some(ts), Some(level), Some(source), Some(message)) => (ts, level, source, message),
        _ => return Err(DecodeError::Shape),
    };

    let timestamp = parse_timestamp(ts_field).ok_or(DecodeError::InvalidTimestamp)?;
    let level = LogLevel::parse(level_field);
    let source = match source_field.trim() {
        "" => DEFAULT_SOURCE.to_owned(),
        tag => tag.to_owned(),
    };

    Ok(LogRecord {
        timestamp,
        level,
        source,
        message: message.trim().to_owned(),
    })
}

/// Skip a leading `[...]` marker if one closes within the scan window.
fn strip_bracket_prefix(line: &str) -> &str {
    if !line.starts_with('[') {
        return line;
    }
    let window = &line[..line.len().min(MAX_PREFIX_SCAN)];
    match window.find(']') {
        Some(close) => &line[close + 1..],
        None => line,
    }
}

/// Lines that are clearly pieces of a nested structured payload: a JSON
/// blob split across lines, a quoted tail, a continuation. Rejecting
/// them beats rendering garbage rows.
fn is_structured_fragment(body: &str) -> bool {
    matches!(
        body.as_bytes().first(),
        Some(b'{') | Some(b'}') | Some(b'"') | Some(b',') | Some(b':')
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
