//! Timestamp normalization for bookmark exports
//!
//! Hoarder is not consistent about how it stores timestamps: depending on the
//! version they show up as epoch seconds (numbers or digit strings) or as
//! ISO 8601 strings with or without an offset. Everything is normalized to a
//! UTC instant with microsecond precision.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, SubsecRound, Utc, Weekday};
use serde_json::Value;

const MICROS_PER_DAY: i64 = 86_400_000_000;

/// A resolved timestamp and its canonical string form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTimestamp {
    /// Canonical form, e.g. `2023-01-01T00:00:00Z`
    pub iso: String,
    pub instant: DateTime<Utc>,
}

/// Normalize a raw timestamp value into a UTC instant
///
/// Resolution order:
/// 1. Absent or `null` values resolve to `default`.
/// 2. Numbers and all-digit strings are epoch seconds (fractions allowed).
/// 3. Other strings are trimmed, a trailing `Z` becomes `+00:00`, and the result
///    is parsed as an ISO 8601 date-time. Naive values are assumed to be UTC.
/// 4. Anything that fails the steps above resolves to `default`.
pub fn normalize_timestamp(value: Option<&Value>, default: DateTime<Utc>) -> NormalizedTimestamp {
    let instant = match value {
        None | Some(Value::Null) => default,
        Some(value) => resolve(value).unwrap_or(default),
    };
    let instant = instant.trunc_subsecs(6);

    NormalizedTimestamp {
        iso: to_iso(&instant),
        instant,
    }
}

/// Render an instant the way Linkwarden expects it
///
/// Uses `Z` instead of `+00:00` and only includes a fractional part when the
/// microsecond component is non-zero.
pub fn to_iso(instant: &DateTime<Utc>) -> String {
    if instant.timestamp_subsec_micros() == 0 {
        instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    } else {
        instant.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
    }
}

/// Convert epoch seconds to a UTC instant
///
/// Returns `None` when the value is not finite or falls outside years 1 through 9999.
pub fn from_epoch_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }

    let micros = (seconds * 1_000_000.0).round_ties_even();
    if micros.abs() >= i64::MAX as f64 {
        return None;
    }

    DateTime::<Utc>::from_timestamp_micros(micros as i64).filter(is_supported_year)
}

/// Resolve a non-null raw value to an instant
///
/// JSON booleans are not numbers, so `true`/`false` never count as epoch seconds
/// and resolve to `None` like any other unreadable value.
fn resolve(value: &Value) -> Option<DateTime<Utc>> {
    let from_epoch = match value {
        Value::Number(number) => match number.as_i64() {
            Some(seconds) => DateTime::<Utc>::from_timestamp(seconds, 0).filter(is_supported_year),
            None => number.as_f64().and_then(from_epoch_seconds),
        },
        Value::String(raw) if is_all_digits(raw) => {
            raw.parse::<f64>().ok().and_then(from_epoch_seconds)
        }
        _ => None,
    };

    from_epoch.or_else(|| value.as_str().and_then(parse_datetime))
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let raw = match raw.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => raw.to_string(),
    };

    parse_iso8601(&raw).filter(is_supported_year)
}

/// Parse an ISO 8601 date-time
///
/// Accepts calendar dates (`YYYY-MM-DD`, `YYYYMMDD`) and week dates (`YYYY-Www[-D]`,
/// `YYYYWww[D]`), optionally followed by any single separator character and a time
/// of the form `HH[:MM[:SS[.ffffff]]]` (colons optional, `.` or `,` before the
/// fraction). The time may carry a `±HH[:MM[:SS[.ffffff]]]` offset. Values without
/// an offset are UTC.
fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    let separator = datetime_separator(raw.as_bytes())?;
    if !raw.is_char_boundary(separator) {
        return None;
    }

    let (date_part, rest) = raw.split_at(separator);
    let date = parse_date(date_part)?;

    let time_part = rest.chars().next().map_or("", |sep| &rest[sep.len_utf8()..]);
    let (time, offset_micros) = if time_part.is_empty() {
        (NaiveTime::from_hms_opt(0, 0, 0)?, 0)
    } else {
        parse_time(time_part)?
    };

    date.and_time(time)
        .and_utc()
        .checked_sub_signed(Duration::microseconds(offset_micros))
}

/// Byte position of the date/time separator
fn datetime_separator(bytes: &[u8]) -> Option<usize> {
    let len = bytes.len();
    if len < 7 {
        return None;
    }
    if len == 7 {
        return Some(7);
    }

    match (bytes[4], bytes[5]) {
        (b'-', b'W') => {
            if len > 8 && bytes[8] == b'-' {
                if len == 9 {
                    None
                } else if len > 10 && bytes[10].is_ascii_digit() {
                    Some(8)
                } else {
                    Some(10)
                }
            } else {
                Some(8)
            }
        }
        (b'-', _) => Some(10),
        (b'W', _) => {
            let digits_end = 7 + bytes[7..].iter().take_while(|b| b.is_ascii_digit()).count();
            if digits_end < 9 {
                Some(digits_end)
            } else if digits_end % 2 == 0 {
                Some(7)
            } else {
                Some(8)
            }
        }
        _ => Some(8),
    }
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    let bytes = date.as_bytes();
    if !matches!(bytes.len(), 7 | 8 | 10) {
        return None;
    }

    let year = i32::try_from(parse_digits(&bytes[..4])?).ok()?;
    let has_sep = bytes[4] == b'-';
    let mut pos = 4 + usize::from(has_sep);

    let parsed = if bytes.get(pos) == Some(&b'W') {
        pos += 1;
        let week = parse_digits(bytes.get(pos..pos + 2)?)?;
        pos += 2;

        let mut day = 1;
        if pos < bytes.len() {
            if (bytes[pos] == b'-') != has_sep {
                return None;
            }
            pos += usize::from(has_sep);
            day = parse_digits(bytes.get(pos..pos + 1)?)?;
            pos += 1;
        }

        let weekday = Weekday::try_from(u8::try_from(day.checked_sub(1)?).ok()?).ok()?;
        NaiveDate::from_isoywd_opt(year, week, weekday)
    } else {
        let month = parse_digits(bytes.get(pos..pos + 2)?)?;
        pos += 2;
        if (bytes.get(pos) == Some(&b'-')) != has_sep {
            return None;
        }
        pos += usize::from(has_sep);
        let day = parse_digits(bytes.get(pos..pos + 2)?)?;
        pos += 2;

        NaiveDate::from_ymd_opt(year, month, day)
    };

    parsed.filter(|_| pos == bytes.len())
}

/// Parse the time part, returning the wall time and its UTC offset in microseconds
fn parse_time(time: &str) -> Option<(NaiveTime, i64)> {
    if time.len() < 2 {
        return None;
    }

    let offset_start = time.find('-').or_else(|| time.find('+'));
    let clock = &time[..offset_start.unwrap_or(time.len())];
    let [hour, minute, second, micros] = parse_clock(clock)?;
    let wall = NaiveTime::from_hms_micro_opt(hour, minute, second, micros)?;

    let Some(start) = offset_start else {
        return Some((wall, 0));
    };

    let offset = &time[start + 1..];
    if matches!(offset.len(), 0 | 1 | 3) {
        return None;
    }
    let [hours, minutes, seconds, fraction] = parse_clock(offset)?;
    let magnitude = ((i64::from(hours) * 60 + i64::from(minutes)) * 60 + i64::from(seconds))
        * 1_000_000
        + i64::from(fraction);
    if magnitude >= MICROS_PER_DAY {
        return None;
    }

    let sign = if time.as_bytes()[start] == b'-' { -1 } else { 1 };
    Some((wall, sign * magnitude))
}

/// Split `HH[:?MM[:?SS[{.,}ffffff]]]` into hours, minutes, seconds and microseconds
///
/// Fraction digits past the sixth are dropped but must still be digits.
fn parse_clock(clock: &str) -> Option<[u32; 4]> {
    let bytes = clock.as_bytes();
    let mut components = [0u32; 4];
    let mut pos = 0;
    let mut has_sep = false;

    for (index, component) in components.iter_mut().take(3).enumerate() {
        *component = parse_digits(bytes.get(pos..pos + 2)?)?;
        pos += 2;

        let next = bytes.get(pos).copied();
        if index == 0 {
            has_sep = next == Some(b':');
        }
        if next.is_none() || index == 2 {
            break;
        }
        if has_sep && next != Some(b':') {
            return None;
        }
        pos += usize::from(has_sep);
    }

    if pos < bytes.len() {
        if !matches!(bytes[pos], b'.' | b',') {
            return None;
        }
        let fraction = &bytes[pos + 1..];
        let precision = fraction.len().min(6);
        let micros = parse_digits(&fraction[..precision])?;
        if !fraction[precision..].iter().all(u8::is_ascii_digit) {
            return None;
        }
        components[3] = micros * 10u32.pow((6 - precision) as u32);
    }

    Some(components)
}

fn parse_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(
        bytes
            .iter()
            .fold(0, |acc, digit| acc * 10 + u32::from(digit - b'0')),
    )
}

fn is_all_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit())
}

fn is_supported_year(instant: &DateTime<Utc>) -> bool {
    (1..=9999).contains(&instant.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn default_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn normalize(value: Value) -> NormalizedTimestamp {
        normalize_timestamp(Some(&value), default_instant())
    }

    // ============================================================================
    // Absent and fallback values
    // ============================================================================

    #[test]
    fn test_absent_value_uses_default() {
        let result = normalize_timestamp(None, default_instant());
        assert_eq!(result.instant, default_instant());
        assert_eq!(result.iso, "2024-06-01T12:00:00Z");
    }

    #[test]
    fn test_null_value_uses_default() {
        assert_eq!(normalize(Value::Null).instant, default_instant());
    }

    #[test]
    fn test_garbage_string_uses_default() {
        assert_eq!(normalize(json!("not a date")).instant, default_instant());
    }

    #[test]
    fn test_blank_string_uses_default() {
        assert_eq!(normalize(json!("   ")).instant, default_instant());
    }

    #[test]
    fn test_booleans_are_not_epoch_seconds() {
        assert_eq!(normalize(json!(true)).instant, default_instant());
        assert_eq!(normalize(json!(false)).instant, default_instant());
    }

    #[test]
    fn test_non_scalar_values_use_default() {
        assert_eq!(normalize(json!([1, 2])).instant, default_instant());
        assert_eq!(normalize(json!({"seconds": 1})).instant, default_instant());
    }

    #[test]
    fn test_overflowing_epoch_uses_default() {
        // Roughly the year 33658
        assert_eq!(normalize(json!(1_000_000_000_000i64)).instant, default_instant());
        assert_eq!(normalize(json!("99999999999999")).instant, default_instant());
    }

    #[test]
    fn test_default_keeps_microseconds_and_drops_nanoseconds() {
        let default = Utc
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::nanoseconds(123_456_789))
            .unwrap();
        let result = normalize_timestamp(None, default);
        assert_eq!(result.iso, "2024-06-01T12:00:00.123456Z");
    }

    // ============================================================================
    // Epoch values
    // ============================================================================

    #[test]
    fn test_integer_epoch_seconds() {
        let result = normalize(json!(1_700_000_000));
        assert_eq!(result.instant, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        assert_eq!(result.iso, "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_digit_string_epoch_seconds() {
        let result = normalize(json!("1700000000"));
        assert_eq!(result.instant, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    }

    #[test]
    fn test_fractional_epoch_seconds() {
        let result = normalize(json!(1_700_000_000.5));
        assert_eq!(result.iso, "2023-11-14T22:13:20.500000Z");
    }

    #[test]
    fn test_epoch_zero() {
        assert_eq!(normalize(json!(0)).iso, "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_epoch_values_match_seconds_since_epoch() {
        for seconds in [1i64, 86_400, 946_684_800, 1_234_567_890, 2_000_000_000] {
            let expected = Utc.timestamp_opt(seconds, 0).unwrap();
            assert_eq!(normalize(json!(seconds)).instant, expected);
            assert_eq!(normalize(json!(seconds.to_string())).instant, expected);
        }
    }

    // ============================================================================
    // ISO 8601 strings
    // ============================================================================

    #[test]
    fn test_iso_with_z_suffix() {
        let result = normalize(json!("2023-01-01T00:00:00Z"));
        assert_eq!(result.instant, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(result.iso, "2023-01-01T00:00:00Z");
    }

    #[test]
    fn test_iso_with_fraction_and_z_suffix() {
        let result = normalize(json!("2023-05-04T10:20:30.250Z"));
        assert_eq!(result.iso, "2023-05-04T10:20:30.250000Z");
    }

    #[test]
    fn test_iso_with_offset_is_converted_to_utc() {
        let result = normalize(json!("2023-01-01T05:30:00+05:30"));
        assert_eq!(result.iso, "2023-01-01T00:00:00Z");
    }

    #[test]
    fn test_iso_with_compact_offset() {
        let result = normalize(json!("2023-01-01T00:00:00-0200"));
        assert_eq!(result.iso, "2023-01-01T02:00:00Z");
    }

    #[test]
    fn test_naive_iso_is_assumed_utc() {
        let result = normalize(json!("2023-01-01T08:15:00"));
        assert_eq!(result.iso, "2023-01-01T08:15:00Z");
    }

    #[test]
    fn test_space_separated_datetime() {
        let result = normalize(json!("2023-01-01 08:15:00"));
        assert_eq!(result.iso, "2023-01-01T08:15:00Z");
    }

    #[test]
    fn test_datetime_without_seconds() {
        let result = normalize(json!("2023-01-01T08:15"));
        assert_eq!(result.iso, "2023-01-01T08:15:00Z");
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        let result = normalize(json!("2023-01-01"));
        assert_eq!(result.iso, "2023-01-01T00:00:00Z");
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let result = normalize(json!("  2023-01-01T00:00:00Z\n"));
        assert_eq!(result.iso, "2023-01-01T00:00:00Z");
    }

    #[test]
    fn test_z_suffix_matches_explicit_utc_offset() {
        for raw in [
            "2020-02-29T23:59:59Z",
            "1999-12-31T00:00:00.000001Z",
            "2023-07-15T13:45:00.5Z",
        ] {
            let with_offset = raw.replace('Z', "+00:00");
            let expected = DateTime::parse_from_rfc3339(&with_offset)
                .unwrap()
                .with_timezone(&Utc);

            let result = normalize(json!(raw));
            assert_eq!(result.instant, expected);

            let reparsed = DateTime::parse_from_rfc3339(&result.iso)
                .unwrap()
                .with_timezone(&Utc);
            assert_eq!(reparsed, expected);
        }
    }

    #[test]
    fn test_extended_iso_shapes() {
        let cases = [
            ("2023-01-01T08", "2023-01-01T08:00:00Z"),
            ("2023-01-01T0815", "2023-01-01T08:15:00Z"),
            ("20230101T081500", "2023-01-01T08:15:00Z"),
            ("2023-01-01T08:15:00,5", "2023-01-01T08:15:00.500000Z"),
            ("2023-01-01T08:15:00.123456789", "2023-01-01T08:15:00.123456Z"),
            ("2023-01-01x08:15", "2023-01-01T08:15:00Z"),
            ("2023-W01", "2023-01-02T00:00:00Z"),
            ("2023-W01-1", "2023-01-02T00:00:00Z"),
            ("2023W011", "2023-01-02T00:00:00Z"),
            ("2023-W52-7T10:00", "2023-12-31T10:00:00Z"),
            ("2020-W53-5", "2021-01-01T00:00:00Z"),
            ("2023-01-01T00:00:00+05:30:00", "2022-12-31T18:30:00Z"),
            ("2023-01-01T08:15:00+01", "2023-01-01T07:15:00Z"),
            ("20230101T0815-0130", "2023-01-01T09:45:00Z"),
        ];

        for (raw, expected) in cases {
            assert_eq!(normalize(json!(raw)).iso, expected, "parsing {raw}");
        }
    }

    #[test]
    fn test_malformed_iso_shapes_use_default() {
        for raw in [
            "2023-01-01T24:00",
            "2023-01-01T08:15:60",
            "2023-02-30",
            "2023-0101",
            "202301-01",
            "2023-W54-1",
            "2023-W01-8",
            "2023-W01-0",
            "2023-01-01T08:15:00.",
            "2023-01-01T08:15:00.12x",
            "2023-01-01T08:15:00+0",
            "2023-01-01T08:15:00+24:00",
            "2023-01-01T08:1",
            "2023-01-01T08:15:00Z+01:00",
        ] {
            assert_eq!(
                normalize(json!(raw)).instant,
                default_instant(),
                "parsing {raw}"
            );
        }
    }

    // ============================================================================
    // to_iso tests
    // ============================================================================

    #[test]
    fn test_to_iso_without_fraction() {
        let instant = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_iso(&instant), "2023-01-01T00:00:00Z");
    }

    #[test]
    fn test_to_iso_with_microseconds() {
        let instant = Utc.timestamp_micros(1_700_000_000_000_001).unwrap();
        assert_eq!(to_iso(&instant), "2023-11-14T22:13:20.000001Z");
    }

    #[test]
    fn test_from_epoch_seconds_rejects_non_finite() {
        assert!(from_epoch_seconds(f64::NAN).is_none());
        assert!(from_epoch_seconds(f64::INFINITY).is_none());
    }
}
