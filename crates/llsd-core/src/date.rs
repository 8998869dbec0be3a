//! # Dates — ISO 8601 UTC Timestamps
//!
//! LLSD dates are UTC instants. Text forms are `YYYY-MM-DDThh:mm:ssZ` with an
//! optional fraction of a second (`.fff`, any number of digits). Instants are
//! held at millisecond resolution; extra fraction digits are truncated.
//!
//! Only the `Z` suffix is accepted. Impossible calendar values (month 13,
//! February 30) are rejected rather than rolled over.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::error::{LlsdError, Result};

/// The default date produced by failed coercions: the Unix epoch.
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// Parse an ISO 8601 UTC timestamp.
///
/// # Errors
///
/// Returns [`LlsdError::InvalidDate`] if the text does not match
/// `YYYY-MM-DDThh:mm:ss[.f*]Z` or names an impossible instant.
pub fn parse_iso_date(text: &str) -> Result<DateTime<Utc>> {
    let invalid = || LlsdError::InvalidDate(format!("{text:?}"));
    let b = text.as_bytes();

    if b.len() < 20 || b[b.len() - 1] != b'Z' {
        return Err(invalid());
    }
    let separators = [(4, b'-'), (7, b'-'), (10, b'T'), (13, b':'), (16, b':')];
    if separators.iter().any(|&(i, c)| b[i] != c) {
        return Err(invalid());
    }

    let field = |range: std::ops::Range<usize>| -> Option<u32> {
        let digits = &b[range];
        if !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        digits
            .iter()
            .try_fold(0u32, |acc, d| acc.checked_mul(10)?.checked_add(u32::from(d - b'0')))
    };

    let year = field(0..4).ok_or_else(invalid)?;
    let month = field(5..7).ok_or_else(invalid)?;
    let day = field(8..10).ok_or_else(invalid)?;
    let hour = field(11..13).ok_or_else(invalid)?;
    let minute = field(14..16).ok_or_else(invalid)?;
    let second = field(17..19).ok_or_else(invalid)?;

    // Optional fraction between the seconds and the trailing Z.
    let fraction = &b[19..b.len() - 1];
    let millis = match fraction.split_first() {
        None => 0,
        Some((b'.', digits)) if digits.iter().all(u8::is_ascii_digit) => digits
            .iter()
            .chain(std::iter::repeat(&b'0'))
            .take(3)
            .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0')),
        Some(_) => return Err(invalid()),
    };

    let year = i32::try_from(year).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_milli_opt(hour, minute, second, millis))
        .map(|naive| naive.and_utc())
        .ok_or_else(invalid)
}

/// Render a date as `YYYY-MM-DDThh:mm:ss.sssZ`.
pub fn format_iso_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Seconds since the Unix epoch, with the millisecond fraction.
pub fn to_epoch_seconds(date: &DateTime<Utc>) -> f64 {
    date.timestamp_millis() as f64 / 1000.0
}

/// Build a date from seconds since the Unix epoch, rounded to the nearest
/// millisecond.
///
/// # Errors
///
/// Returns [`LlsdError::InvalidDate`] for non-finite input or instants outside
/// the representable range.
pub fn from_epoch_seconds(seconds: f64) -> Result<DateTime<Utc>> {
    let millis = (seconds * 1000.0).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return Err(LlsdError::InvalidDate(format!("{seconds} seconds since epoch")));
    }
    DateTime::from_timestamp_millis(millis as i64)
        .ok_or_else(|| LlsdError::InvalidDate(format!("{seconds} seconds since epoch")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_parse_whole_seconds() {
        let d = parse_iso_date("2010-06-01T12:30:45Z").unwrap();
        assert_eq!(d, Utc.with_ymd_and_hms(2010, 6, 1, 12, 30, 45).unwrap());
    }

    #[test]
    fn test_parse_fraction_truncates_to_millis() {
        let d = parse_iso_date("2010-06-01T12:30:45.123456Z").unwrap();
        assert_eq!(d.nanosecond(), 123_000_000);

        let d = parse_iso_date("2010-06-01T12:30:45.5Z").unwrap();
        assert_eq!(d.nanosecond(), 500_000_000);

        // A bare dot is an empty fraction.
        let d = parse_iso_date("2010-06-01T12:30:45.Z").unwrap();
        assert_eq!(d.nanosecond(), 0);
    }

    #[test]
    fn test_rejects_malformed() {
        for text in [
            "",
            "2010-06-01",
            "2010-06-01T12:30:45",
            "2010-06-01T12:30:45+00:00",
            "2010-06-01 12:30:45Z",
            "2010-13-01T12:30:45Z",
            "2010-02-30T12:30:45Z",
            "2010-06-01T24:00:00Z",
            "2010-06-01T12:30:45.1aZ",
            "201a-06-01T12:30:45Z",
        ] {
            assert!(parse_iso_date(text).is_err(), "{text:?} should be rejected");
        }
    }

    #[test]
    fn test_format() {
        let d = Utc.with_ymd_and_hms(2010, 6, 1, 12, 30, 45).unwrap();
        assert_eq!(format_iso_date(&d), "2010-06-01T12:30:45.000Z");
        assert_eq!(format_iso_date(&epoch()), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_epoch_seconds_round_trip() {
        let d = parse_iso_date("2024-02-29T23:59:59.250Z").unwrap();
        let secs = to_epoch_seconds(&d);
        assert_eq!(from_epoch_seconds(secs).unwrap(), d);
        assert_eq!(to_epoch_seconds(&epoch()), 0.0);
    }

    #[test]
    fn test_from_epoch_rejects_non_finite() {
        assert!(from_epoch_seconds(f64::NAN).is_err());
        assert!(from_epoch_seconds(f64::INFINITY).is_err());
        assert!(from_epoch_seconds(1e300).is_err());
    }
}
