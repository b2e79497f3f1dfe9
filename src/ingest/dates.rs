//! Best-effort date coercion for uploaded cells.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Parses a date cell, returning `None` when no known layout matches.
///
/// Accepts ISO dates, slash dates (`YYYY/MM/DD`, month-first `MM/DD/YYYY`),
/// month-name forms, and datetimes (the time part is dropped).
///
/// # Examples
///
/// ```
/// use gratuity_tracker::ingest::coerce_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2015, 6, 1);
/// assert_eq!(coerce_date("2015-06-01"), expected);
/// assert_eq!(coerce_date("06/01/2015"), expected);
/// assert_eq!(coerce_date("2015-06-01 00:00:00"), expected);
/// assert_eq!(coerce_date("not a date"), None);
/// ```
pub fn coerce_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|datetime| datetime.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
}
