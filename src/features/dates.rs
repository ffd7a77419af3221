//! Lenient date-label parsing.
//!
//! Chart labels arrive in whatever format the source page used. We accept the
//! common ISO, slash, and month-name layouts and treat anything else as noise.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::RawValue;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%b %d, %Y",
];

/// Parse a date label; `None` when it is not recognised.
pub fn parse_label(label: &str) -> Option<NaiveDateTime> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(label) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(label, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(label, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse a raw `x` cell. Only text cells can carry a date.
pub fn parse_raw_label(value: &RawValue) -> Option<NaiveDateTime> {
    match value {
        RawValue::Text(s) => parse_label(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn accepts_common_layouts() {
        assert_eq!(parse_label("2025-01-03"), Some(ymd(2025, 1, 3)));
        assert_eq!(parse_label(" 2025/01/03 "), Some(ymd(2025, 1, 3)));
        assert_eq!(parse_label("03-01-2025"), Some(ymd(2025, 1, 3)));
        assert_eq!(parse_label("01/03/2025"), Some(ymd(2025, 1, 3)));
        assert_eq!(parse_label("23-Oct-2025"), Some(ymd(2025, 10, 23)));
        assert_eq!(parse_label("Oct 23, 2025"), Some(ymd(2025, 10, 23)));
        assert_eq!(parse_label("2025-01-03T00:00:00Z"), Some(ymd(2025, 1, 3)));
    }

    #[test]
    fn rejects_noise() {
        assert_eq!(parse_label(""), None);
        assert_eq!(parse_label("not a date"), None);
        assert_eq!(parse_label("2025-13-45"), None);
        assert_eq!(parse_raw_label(&RawValue::Number(20250101.0)), None);
        assert_eq!(parse_raw_label(&RawValue::Null), None);
    }
}
