//! Timestamp disambiguation.
//!
//! Export files carry creation times in whatever shape the tool felt like
//! that year: an epoch number (seconds *or* milliseconds), an all-digits
//! string, or one of a handful of date-string layouts. This module takes
//! whatever landed in the field and produces a UTC instant, or nothing.

use crate::consts::{ALL_DIGITS_REGEX, MILLIS_THRESHOLD, MIN_PLAUSIBLE_YEAR};
use serde_json::Value;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Iso8601;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcDateTime};

// "2013-06-14 17:27:00 GMT", the shape of the "date-gmt" field.
const DATE_GMT_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second] GMT");

// "Sat, 14 Jun 2013 13:27:00", the shape of the "date" field.
const DATE_RFC_LIKE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second]"
);

/// Interpret a raw timestamp field of any supported shape.
///
/// Numbers (and all-digits strings) are epoch values; anything below 10^12
/// is taken as seconds and scaled to milliseconds. Other strings go through
/// the known date layouts, and a parse that lands at year 2000 or earlier
/// is discarded as a placeholder.
pub fn parse_timestamp(value: &Value) -> Option<UtcDateTime> {
    match value {
        Value::Number(n) => from_epoch(n.as_i64()?),
        Value::String(s) if ALL_DIGITS_REGEX.is_match(s) => from_epoch(s.parse().ok()?),
        Value::String(s) => from_date_string(s),
        _ => None,
    }
}

fn from_epoch(epoch: i64) -> Option<UtcDateTime> {
    if epoch == 0 {
        return None;
    }
    let millis = if epoch < MILLIS_THRESHOLD { epoch.checked_mul(1000)? } else { epoch };
    UtcDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}

fn from_date_string(text: &str) -> Option<UtcDateTime> {
    let parsed = PrimitiveDateTime::parse(text, DATE_GMT_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(text, DATE_RFC_LIKE_FORMAT))
        .map(PrimitiveDateTime::as_utc)
        .or_else(|_| OffsetDateTime::parse(text, &Iso8601::DEFAULT).map(UtcDateTime::from))
        .ok()?;
    (parsed.year() > MIN_PLAUSIBLE_YEAR).then_some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use time::macros::utc_datetime;

    #[rstest]
    #[case(json!(1700000000))]
    #[case(json!(1700000000000_i64))]
    #[case(json!("1700000000"))]
    #[case(json!("1700000000000"))]
    fn seconds_and_milliseconds_normalize_identically(#[case] value: Value) {
        assert_eq!(parse_timestamp(&value), Some(utc_datetime!(2023-11-14 22:13:20)));
    }

    #[test]
    fn gmt_date_string_parses() {
        assert_eq!(
            parse_timestamp(&json!("2013-06-14 17:27:00 GMT")),
            Some(utc_datetime!(2013-06-14 17:27:00)),
        );
    }

    #[test]
    fn rfc_like_date_string_parses() {
        assert_eq!(
            parse_timestamp(&json!("Fri, 14 Jun 2013 13:27:00")),
            Some(utc_datetime!(2013-06-14 13:27:00)),
        );
    }

    #[test]
    fn iso_date_string_parses() {
        assert_eq!(
            parse_timestamp(&json!("2024-01-01T00:00:00Z")),
            Some(utc_datetime!(2024-01-01 00:00:00)),
        );
    }

    #[rstest]
    #[case(json!("2000-01-01 00:00:00 GMT"))]
    #[case(json!("1970-05-05 10:00:00 GMT"))]
    fn implausibly_old_date_strings_are_rejected(#[case] value: Value) {
        assert_eq!(parse_timestamp(&value), None);
    }

    #[rstest]
    #[case(json!("next tuesday"))]
    #[case(json!(0))]
    #[case(json!(null))]
    #[case(json!(["2024"]))]
    fn garbage_yields_absent(#[case] value: Value) {
        assert_eq!(parse_timestamp(&value), None);
    }
}
