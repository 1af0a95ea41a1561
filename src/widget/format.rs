//! Text helpers for previews and timestamps.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Default sidebar preview length, in characters.
pub const DEFAULT_PREVIEW_LEN: usize = 60;

/// Preview shown for empty or missing text.
pub const EMPTY_PREVIEW: &str = "(empty)";

const ELLIPSIS: char = '…';

/// Collapse whitespace and shorten `text` to at most `max_len` characters.
///
/// Runs of whitespace become one space and the ends are trimmed. Text longer
/// than `max_len` keeps its first `max_len - 1` characters followed by `…`.
/// Empty, whitespace-only or missing input yields [`EMPTY_PREVIEW`].
/// Lengths are counted in `char`s, never bytes.
pub fn summarize(text: Option<&str>, max_len: usize) -> String {
    let collapsed = text
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    if collapsed.is_empty() {
        return EMPTY_PREVIEW.to_owned();
    }
    if collapsed.chars().count() <= max_len {
        return collapsed;
    }
    if max_len == 0 {
        return String::new();
    }

    let mut preview: String = collapsed.chars().take(max_len - 1).collect();
    preview.push(ELLIPSIS);
    preview
}

/// Parse a server timestamp.
///
/// Accepts RFC 3339 (`Z` or an offset), a naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// read as local wall-clock time, or a bare date read as UTC midnight. These
/// are the rules `Date` parsing follows in browsers.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(ts) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        // Skipped (DST gap) wall-clock times have no instant.
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|at| at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Local display string for an instant, e.g. `11/9/2024, 3:04:05 PM`.
pub fn format_instant(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

/// Local display string for a server timestamp; empty when it cannot be parsed.
pub fn format_time(ts: &str) -> String {
    parse_timestamp(ts).map(format_instant).unwrap_or_default()
}
