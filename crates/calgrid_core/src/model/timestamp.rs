//! ISO-8601 timestamp text format for persisted events.
//!
//! # Invariants
//! - `format_timestamp` output parses back to the identical instant.
//! - Parsing never assumes a timezone; offsets are dropped, wall-clock kept.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Canonical write format. `%.f` emits fractional seconds only when present.
const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
/// Minute precision, as produced by `datetime-local` form inputs.
const MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats one timestamp as ISO-8601 text without offset.
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(CANONICAL_FORMAT).to_string()
}

/// Parses ISO-8601 text into a wall-clock timestamp.
///
/// Accepted shapes, tried in order:
/// - `YYYY-MM-DDTHH:MM:SS[.fff]`
/// - `YYYY-MM-DDTHH:MM`
/// - RFC 3339 with offset (`...Z`, `...+02:00`); the offset is dropped
/// - `YYYY-MM-DD` (midnight)
///
/// Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDateTime::parse_from_str(trimmed, CANONICAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, MINUTE_FORMAT))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|value| value.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .ok()
                .map(|date| date.and_time(NaiveTime::default()))
        })
}

/// Serde adapter for `NaiveDateTime` fields stored as ISO-8601 strings.
pub mod iso8601 {
    use super::{format_timestamp, parse_timestamp};
    use chrono::NaiveDateTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid ISO-8601 timestamp `{raw}`")))
    }
}
