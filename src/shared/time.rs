//! Timestamp parsing for request fields.
//!
//! Clients send either RFC 3339 timestamps or naive ISO 8601 values
//! (`2024-05-01T09:30:00`, `2024-05-01 09:30`, `2024-05-01`). Naive values
//! are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::shared::error::SharedError;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp field, naming `field` in the error.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, SharedError> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(SharedError::InvalidTimestamp {
        field: field.to_string(),
    })
}

/// Parse an optional timestamp field.
pub fn parse_optional_timestamp(
    field: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, SharedError> {
    value.map(|v| parse_timestamp(field, v)).transpose()
}
