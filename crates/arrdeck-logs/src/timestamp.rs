//! Timestamp normalization for server-rendered log lines.
//!
//! The server has already converted timestamps to the user's configured
//! timezone, so no timezone math happens here, only strict validation of
//! the rendered `YYYY-MM-DD HH:MM:SS` shape into a comparable value.

use chrono::NaiveDateTime;

/// The only accepted timestamp shape.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rendered length of [`TIMESTAMP_FORMAT`].
pub const TIMESTAMP_LEN: usize = 19;

const MIN_YEAR: i32 = 2020;
const MAX_YEAR: i32 = 2030;

/// Parse a server-rendered timestamp into a comparable instant.
///
/// Returns `None` for anything that is not exactly `YYYY-MM-DD HH:MM:SS`
/// with all fields in range. Chrono's own date construction rejects
/// impossible dates (Feb 30, day 31 in a 30-day month), so a successful
/// parse means the string round-trips.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.len() != TIMESTAMP_LEN || !has_fixed_shape(raw.as_bytes()) {
        return None;
    }

    let parsed = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()?;

    use chrono::{Datelike, Timelike};
    let year = parsed.year();
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }
    // Chrono already bounds these; the checks keep the contract explicit
    // against future format changes.
    if parsed.month() < 1 || parsed.month() > 12 {
        return None;
    }
    if parsed.day() < 1 || parsed.day() > 31 {
        return None;
    }
    if parsed.hour() > 23 || parsed.minute() > 59 || parsed.second() > 59 {
        return None;
    }

    Some(parsed)
}

/// Positional check: digits and separators exactly where the fixed format
/// puts them. Chrono's `%m`/`%d` tolerate unpadded fields, which the server
/// never emits, so unpadded input is rejected here first.
fn has_fixed_shape(bytes: &[u8]) -> bool {
    debug_assert_eq!(bytes.len(), TIMESTAMP_LEN);
    for (i, b) in bytes.iter().enumerate() {
        let ok = match i {
            4 | 7 => *b == b'-',
            10 => *b == b' ',
            13 | 16 => *b == b':',
            _ => b.is_ascii_digit(),
        };
        if !ok {
            return false;
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_timestamp() {
        let ts = parse_timestamp("2024-01-01 10:00:00").unwrap();
        assert_eq!(ts.to_string(), "2024-01-01 10:00:00");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert!(parse_timestamp("  2024-06-15 23:59:59  ").is_some());
    }

    #[test]
    fn rejects_out_of_range_years() {
        assert!(parse_timestamp("2019-12-31 23:59:59").is_none());
        assert!(parse_timestamp("2031-01-01 00:00:00").is_none());
        assert!(parse_timestamp("2020-01-01 00:00:00").is_some());
        assert!(parse_timestamp("2030-12-31 23:59:59").is_some());
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(parse_timestamp("2024-02-30 10:00:00").is_none());
        assert!(parse_timestamp("2023-02-29 10:00:00").is_none());
        assert!(parse_timestamp("2024-04-31 10:00:00").is_none());
        // 2024 is a leap year.
        assert!(parse_timestamp("2024-02-29 10:00:00").is_some());
    }

    #[test]
    fn rejects_out_of_range_time_fields() {
        assert!(parse_timestamp("2024-01-01 24:00:00").is_none());
        assert!(parse_timestamp("2024-01-01 10:60:00").is_none());
        assert!(parse_timestamp("2024-01-01 10:00:60").is_none());
        assert!(parse_timestamp("2024-13-01 10:00:00").is_none());
        assert!(parse_timestamp("2024-00-01 10:00:00").is_none());
        assert!(parse_timestamp("2024-01-00 10:00:00").is_none());
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2024-01-01").is_none());
        assert!(parse_timestamp("2024-01-01T10:00:00").is_none());
        assert!(parse_timestamp("2024-1-1 10:00:00").is_none());
        assert!(parse_timestamp("2024-01-01 10:00:00.123").is_none());
        assert!(parse_timestamp("yesterday 10:00:00ish").is_none());
    }

    #[test]
    fn parsed_timestamps_compare_chronologically() {
        let earlier = parse_timestamp("2024-01-01 10:00:00").unwrap();
        let later = parse_timestamp("2024-01-01 10:00:01").unwrap();
        assert!(later > earlier);
    }
}
