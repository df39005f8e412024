//! Cell-level cleaning shared by the table loaders.
//!
//! Every parser here is lenient: an unparseable cell becomes `None` rather
//! than failing the whole load.

use chrono::{NaiveDate, NaiveDateTime};

/// Datetime layouts seen in the 311 exports, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
];

/// Returns the trimmed cell, or `None` if it is blank or a null marker.
#[must_use]
pub fn non_empty(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() || is_null_marker(value) {
        return None;
    }
    Some(value.to_string())
}

/// Parses a numeric cell. Non-finite and unparseable values are `None`.
#[must_use]
pub fn parse_f64(raw: Option<&str>) -> Option<f64> {
    let value = non_empty(raw)?;
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a timestamp cell in any of the known layouts.
///
/// Date-only values resolve to midnight.
#[must_use]
pub fn parse_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let value = non_empty(raw)?;

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn is_null_marker(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "nan" | "nat" | "null" | "none" | "n/a"
    )
}
