// src/core/time.rs
//
// Timestamp parsing for CRM exports. The API is not consistent about
// fractional seconds, and hand-edited files bring plain dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};

use crate::error::{Error, Result};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse one timestamp cell.
/// - blank → `Ok(None)` (missing is not an error)
/// - RFC 3339 / ISO 8601, naive date-times (UTC), `YYYY-MM-DD`, epoch millis
/// - anything else → `Err(Error::Timestamp)`
pub fn parse_timestamp(raw: &str) -> Result<Option<DateTime<Utc>>> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("null") {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Some(ndt.and_utc()));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(Some(d.and_time(NaiveTime::MIN).and_utc()));
    }
    // Epoch milliseconds (13 digits in practice); short numbers are not dates.
    if s.len() >= 12 && s.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(ms) = s.parse::<i64>() {
            if let Some(dt) = Utc.timestamp_millis_opt(ms).single() {
                return Ok(Some(dt));
            }
        }
    }
    Err(Error::Timestamp(s!(s)))
}

/// Canonical text form used in every output file.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Lenient `YYYY-MM-DD` parse for text fields.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap().unwrap()
    }

    #[test]
    fn rfc3339_with_and_without_millis_agree() {
        assert_eq!(ts("2025-06-11T01:44:00Z"), ts("2025-06-11T01:44:00.000Z"));
        assert_eq!(format_timestamp(&ts("2025-06-11T01:44:00Z")), "2025-06-11T01:44:00.000Z");
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        assert_eq!(format_timestamp(&ts("2025-01-10T02:00:00+02:00")), "2025-01-10T00:00:00.000Z");
    }

    #[test]
    fn naive_forms_are_utc() {
        assert_eq!(format_timestamp(&ts("2025-01-10 08:30:00")), "2025-01-10T08:30:00.000Z");
        assert_eq!(format_timestamp(&ts("2025-01-10")), "2025-01-10T00:00:00.000Z");
    }

    #[test]
    fn epoch_millis() {
        assert_eq!(format_timestamp(&ts("1736467200000")), "2025-01-10T00:00:00.000Z");
    }

    #[test]
    fn blanks_are_missing_and_garbage_is_an_error() {
        assert!(parse_timestamp("").unwrap().is_none());
        assert!(parse_timestamp("  nan ").unwrap().is_none());
        assert!(parse_timestamp("last tuesday").is_err());
        assert!(parse_timestamp("2025-13-40").is_err());
        assert!(parse_timestamp("42").is_err());
    }
}
