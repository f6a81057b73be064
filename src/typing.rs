//! Column type inference from sample values.

use crate::model::ColumnType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Maximum number of non-empty values examined per column.
pub const SAMPLE_LIMIT: usize = 100;

/// Shortest string accepted as a date. Keeps short numeric-looking codes out.
pub const MIN_DATE_LEN: usize = 8;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Classify a column from its values in row order.
///
/// Only the first [`SAMPLE_LIMIT`] non-empty values count. Numbers win over
/// dates, so `"20240101"` is `Num`.
pub fn infer_type<S: AsRef<str>>(values: &[S]) -> ColumnType {
    let sample: Vec<&str> = values
        .iter()
        .map(|v| v.as_ref())
        .filter(|v| !v.is_empty())
        .take(SAMPLE_LIMIT)
        .collect();

    if sample.is_empty() {
        return ColumnType::Text;
    }
    if sample.iter().all(|v| is_number(v)) {
        return ColumnType::Num;
    }
    if sample
        .iter()
        .all(|v| v.chars().count() >= MIN_DATE_LEN && is_date(v))
    {
        return ColumnType::Date;
    }
    ColumnType::Text
}

/// Finite decimal, exponent or `0x`/`0o`/`0b` prefixed integer, surrounding
/// whitespace ignored.
fn is_number(value: &str) -> bool {
    let v = value.trim();
    if v.is_empty() {
        return false;
    }

    let radix = match v.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &v[2..];
        return !digits.starts_with(['+', '-']) && u128::from_str_radix(digits, radix).is_ok();
    }

    // Rust accepts "inf" and "nan" spellings; finiteness rules them out.
    v.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

fn is_date(value: &str) -> bool {
    let v = value.trim();
    if DateTime::parse_from_rfc3339(v).is_ok() || DateTime::parse_from_rfc2822(v).is_ok() {
        return true;
    }
    DATE_FORMATS
        .iter()
        .any(|f| NaiveDate::parse_from_str(v, f).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|f| NaiveDateTime::parse_from_str(v, f).is_ok())
}
