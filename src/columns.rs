//! Header normalization and canonical column keys.
//!
//! Uploaded extracts disagree on header spelling (`Age 0-5`, `AGE-0-5`, ` age_0_5 `). Every header
//! is reduced to a canonical key before anything else looks at it: surrounding whitespace is
//! stripped, the text is lower-cased, and each run of whitespace, hyphens or underscores becomes a
//! single `_`.

use crate::types::DataType;

pub const DATE: &str = "date";
pub const STATE: &str = "state";
pub const DISTRICT: &str = "district";
pub const PINCODE: &str = "pincode";

pub const AGE_0_5: &str = "age_0_5";
pub const AGE_5_17: &str = "age_5_17";
pub const AGE_18_GREATER: &str = "age_18_greater";

pub const DEMO_AGE_5_17: &str = "demo_age_5_17";
pub const DEMO_AGE_17: &str = "demo_age_17_";

pub const BIO_AGE_5_17: &str = "bio_age_5_17";
pub const BIO_AGE_17: &str = "bio_age_17_";

/// Dimension columns shared by every dataset category.
pub const DIMENSION_KEYS: [&str; 4] = [DATE, STATE, DISTRICT, PINCODE];

/// Key fragments marking a column as a count.
const COUNT_FAMILIES: [&str; 6] = ["age", "demo", "bio", "total", "enrolment", "count"];

/// Normalize a sequence of raw headers, preserving order.
pub fn normalize<S: AsRef<str>>(raw_headers: &[S]) -> Vec<String> {
    raw_headers
        .iter()
        .map(|h| normalize_key(h.as_ref()))
        .collect()
}

/// Normalize a single raw header into its canonical key.
///
/// Total: any input yields a key, possibly the empty string.
pub fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_separator = false;
    for c in raw.trim().chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            if !in_separator {
                out.push('_');
                in_separator = true;
            }
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    out
}

/// Whether `key` names a count-like metric column.
pub fn is_count_column(key: &str) -> bool {
    if DIMENSION_KEYS.contains(&key) {
        return false;
    }
    COUNT_FAMILIES.iter().any(|family| key.contains(family))
}

/// Data type a column is coerced to during ingestion, derived from its key alone.
pub fn column_type(key: &str) -> DataType {
    match key {
        DATE => DataType::Date,
        PINCODE => DataType::Int64,
        _ if is_count_column(key) => DataType::Int64,
        _ => DataType::Utf8,
    }
}
