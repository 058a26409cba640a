//! Timestamp normalization between UK local time and UTC.
//!
//! The backend stores instants as UTC, either in database style
//! (`2025-10-28 12:49:55.7183853`, no offset) or as ISO-8601 with an
//! offset. The dashboard shows and collects wall-clock times in
//! `Europe/London`. Every function here is pure and absorbs parse
//! failures into sentinel strings.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt::Write as _;
use thiserror::Error;

/// Zone all wall-clock values are expressed in.
pub const LOCAL_TZ: Tz = chrono_tz::Europe::London;

/// Rendered for absent input.
pub const EMPTY: &str = "—";
/// Rendered when input cannot be parsed or formatted.
pub const INVALID: &str = "Invalid";
/// Appended to durations measured against the current time.
pub const LIVE_MARKER: &str = "(live)";

/// Day-month-year with a 12-hour clock, e.g. `28 Oct 2025, 12:49 PM`.
pub const DEFAULT_DISPLAY_FORMAT: &str = "%d %b %Y, %I:%M %p";
pub const DATE_FORMAT: &str = "%d %b %Y";
pub const TIME_FORMAT: &str = "%I:%M %p";
/// Value format of an HTML `datetime-local` input.
pub const LOCAL_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const ISO_UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const DATABASE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// Errors from [`parse_timestamp`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("timestamp is empty")]
    Empty,

    #[error("unrecognised timestamp: {0}")]
    Unrecognised(String),
}

/// Result type for timestamp parsing.
pub type Result<T> = std::result::Result<T, TimeParseError>;

/// Serialization used when sending a converted instant to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UtcOutput {
    /// `2025-07-01T08:30:00Z`
    #[default]
    Iso,
    /// `2025-07-01 08:30:00`
    Database,
}

impl UtcOutput {
    fn pattern(self) -> &'static str {
        match self {
            UtcOutput::Iso => ISO_UTC_FORMAT,
            UtcOutput::Database => DATABASE_FORMAT,
        }
    }
}

/// Parse a backend timestamp into a UTC instant truncated to whole seconds.
///
/// Strings carrying an offset are honoured. Anything without an offset is
/// treated as UTC after its sub-second digits are dropped.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TimeParseError::Empty);
    }

    if let Some(instant) = parse_with_offset(raw) {
        return Ok(instant.trunc_subsecs(0));
    }

    parse_naive(raw)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| TimeParseError::Unrecognised(raw.to_string()))
}

/// Format a backend timestamp in local time.
///
/// `format` is a strftime pattern and defaults to
/// [`DEFAULT_DISPLAY_FORMAT`].
pub fn to_local_display(raw: Option<&str>, format: Option<&str>) -> String {
    let Some(raw) = non_blank(raw) else {
        return EMPTY.to_string();
    };

    match parse_timestamp(raw) {
        Ok(instant) => render(
            &instant.with_timezone(&LOCAL_TZ),
            format.unwrap_or(DEFAULT_DISPLAY_FORMAT),
        ),
        Err(_) => INVALID.to_string(),
    }
}

/// Whole hours and minutes between two backend timestamps.
///
/// With no `end` the span runs to now and is marked live.
pub fn duration_between(start: &str, end: Option<&str>) -> String {
    duration_between_at(start, end, Utc::now())
}

/// [`duration_between`] against an explicit current time.
pub fn duration_between_at(start: &str, end: Option<&str>, now: DateTime<Utc>) -> String {
    let Ok(start) = parse_timestamp(start) else {
        return EMPTY.to_string();
    };

    let (end, live) = match non_blank(end) {
        Some(raw) => match parse_timestamp(raw) {
            Ok(end) => (end, false),
            Err(_) => return EMPTY.to_string(),
        },
        None => (now, true),
    };

    // Civil-time difference: a span across a DST change counts the
    // wall-clock hour that was skipped or repeated.
    let span = wall_clock(end) - wall_clock(start);
    let minutes = span.num_minutes().max(0);
    let text = format!("{}h {}m", minutes / 60, minutes % 60);

    if live {
        format!("{text} {LIVE_MARKER}")
    } else {
        text
    }
}

/// Convert a local wall-clock time to a UTC string for the backend.
///
/// `None` converts the current time.
pub fn local_to_utc(local: Option<&str>, output: UtcOutput) -> String {
    local_to_utc_at(local, output, Utc::now())
}

/// [`local_to_utc`] against an explicit current time.
pub fn local_to_utc_at(local: Option<&str>, output: UtcOutput, now: DateTime<Utc>) -> String {
    let instant = match non_blank(local) {
        None => now,
        Some(raw) => match resolve_local(raw) {
            Ok(instant) => instant,
            Err(_) => return INVALID.to_string(),
        },
    };

    render(&instant.trunc_subsecs(0), output.pattern())
}

/// Convert a backend timestamp to a `datetime-local` input value.
pub fn utc_to_local_input(raw: Option<&str>) -> String {
    let Some(raw) = non_blank(raw) else {
        return String::new();
    };

    match parse_timestamp(raw) {
        Ok(instant) => render(&instant.with_timezone(&LOCAL_TZ), LOCAL_INPUT_FORMAT),
        Err(_) => INVALID.to_string(),
    }
}

/// Interpret a wall-clock string in [`LOCAL_TZ`].
///
/// A time repeated by the autumn change resolves to its first occurrence.
/// A time skipped by the spring change is moved forward past the gap.
fn resolve_local(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Some(instant) = parse_with_offset(raw) {
        return Ok(instant);
    }

    let naive =
        parse_naive(raw).ok_or_else(|| TimeParseError::Unrecognised(raw.to_string()))?;

    let local = match LOCAL_TZ.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => LOCAL_TZ
            .from_local_datetime(&(naive + chrono::Duration::hours(1)))
            .earliest(),
    };

    local
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| TimeParseError::Unrecognised(raw.to_string()))
}

fn parse_with_offset(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|pattern| DateTime::parse_from_str(raw, pattern).ok())
        })
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    // Only a run of sub-second digits may follow the dot.
    let without_fraction = match raw.split_once('.') {
        Some((head, fraction)) => {
            if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            head
        }
        None => raw,
    };

    NAIVE_FORMATS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(without_fraction, pattern).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(without_fraction, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn wall_clock(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(&LOCAL_TZ).naive_local()
}

fn render<T: TimeZone>(dt: &DateTime<T>, pattern: &str) -> String
where
    T::Offset: std::fmt::Display,
{
    let mut out = String::new();
    match write!(out, "{}", dt.format(pattern)) {
        Ok(()) => out,
        Err(_) => INVALID.to_string(),
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.trim().is_empty())
}
