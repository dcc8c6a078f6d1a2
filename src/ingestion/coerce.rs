//! Cell-level coercion.
//!
//! Coercion never fails: a cell that cannot be read as its column type becomes [`Value::Null`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::{DataType, Value};

const YEAR_FIRST_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const DAY_FIRST_DATE_FORMATS: &[&str] = &[
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B %Y",
];

const YEAR_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DAY_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%d-%m-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M",
];

/// Coerce a raw cell into `data_type`.
pub fn coerce_cell(raw: &str, data_type: DataType) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match data_type {
        DataType::Utf8 => Value::Utf8(trimmed.to_owned()),
        DataType::Int64 => coerce_count(trimmed).map_or(Value::Null, Value::Int64),
        DataType::Date => parse_date_day_first(trimmed).map_or(Value::Null, Value::Date),
    }
}

/// Parse a date, resolving ambiguous numeric dates day-first.
///
/// A leading group of four digits is read as the year (`2025-09-13`); anything else is read with
/// the day first (`13-09-2025`, `01/02/2025` is 1 February). A time part, if present, is dropped.
pub fn parse_date_day_first(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let first_group = s
        .split(|c: char| !c.is_ascii_alphanumeric())
        .next()
        .unwrap_or_default();
    let year_first = first_group.len() == 4 && first_group.chars().all(|c| c.is_ascii_digit());

    let (date_formats, datetime_formats) = if year_first {
        (YEAR_FIRST_DATE_FORMATS, YEAR_FIRST_DATETIME_FORMATS)
    } else {
        (DAY_FIRST_DATE_FORMATS, DAY_FIRST_DATETIME_FORMATS)
    };

    if let Some(date) = date_formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }
    if let Some(dt) = datetime_formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }
    if year_first {
        return DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive());
    }
    None
}

/// Coerce a raw cell into a non-negative integer count.
///
/// Integral floats (`"12.0"`) are accepted; negatives, fractions and text are not.
pub fn coerce_count(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(v) = s.parse::<i64>() {
        return (v >= 0).then_some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
