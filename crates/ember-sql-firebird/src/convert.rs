//! Bidirectional value conversion between semantic and driver-native form.
//!
//! The driver exchanges values keyed by a native type tag (DATE, TIME,
//! TIMESTAMP, FIXED, TEXT, TEXT_UNICODE, BLOB, BOOLEAN). A
//! [`ConverterTable`] is built once per connection from the negotiated
//! charset and holds both directions: `outbound` (semantic value → driver)
//! and `inbound` (driver → semantic value).
//!
//! Two conversions are intentionally lossy and documented as such:
//! timestamps keep at most 4 fractional-second digits (the engine's
//! maximum precision — truncated, not rounded), and fixed-point values are
//! truncated toward zero to the target scale. Everything else round-trips
//! exactly.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use ember_sql_core::SqlValue;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::Charset;
use crate::names::truncate_name;

/// The driver's native type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeTag {
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp,
    /// Fixed-point numeric, shipped as (unscaled integer, scale).
    Fixed,
    /// Single-byte character data.
    Text,
    /// Multi-byte character data in the connection charset.
    TextUnicode,
    /// Text blob; same codec as `TextUnicode`, no length ceiling.
    Blob,
    /// Boolean stored as smallint 0/1.
    Boolean,
}

/// A value in the driver's wire representation.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverValue {
    /// NULL.
    Null,
    /// Integer (smallint through bigint, and boolean 0/1).
    Int(i64),
    /// Double-precision float.
    Double(f64),
    /// Fixed-point numeric as (unscaled integer, scale).
    Fixed {
        /// Unscaled integer value.
        value: i128,
        /// Number of decimal digits to the right of the point.
        scale: u32,
    },
    /// Raw bytes in the connection charset.
    Bytes(Vec<u8>),
    /// Calendar date.
    Date {
        /// Year.
        year: i32,
        /// Month (1-12).
        month: u32,
        /// Day of month (1-31).
        day: u32,
    },
    /// Time of day. `fraction` is in units of 100 µs (the engine's
    /// timestamp resolution).
    Time {
        /// Hour (0-23).
        hour: u32,
        /// Minute (0-59).
        minute: u32,
        /// Second (0-59).
        second: u32,
        /// Fractional seconds in 1/10000 s units.
        fraction: u32,
    },
    /// Date and time, fraction as for [`DriverValue::Time`].
    Timestamp {
        /// Year.
        year: i32,
        /// Month (1-12).
        month: u32,
        /// Day of month (1-31).
        day: u32,
        /// Hour (0-23).
        hour: u32,
        /// Minute (0-59).
        minute: u32,
        /// Second (0-59).
        second: u32,
        /// Fractional seconds in 1/10000 s units.
        fraction: u32,
    },
}

/// Conversion direction, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Semantic value → driver value.
    Outbound,
    /// Driver value → semantic value.
    Inbound,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outbound => f.write_str("outbound"),
            Self::Inbound => f.write_str("inbound"),
        }
    }
}

/// A value could not be mapped between semantic and native representation.
#[derive(Debug, Clone, Error)]
#[error("{direction} conversion failed for {tag:?} value {value}: {reason}")]
pub struct ConvertError {
    /// Which direction failed.
    pub direction: Direction,
    /// The native tag being converted.
    pub tag: NativeTag,
    /// Debug rendering of the offending value.
    pub value: String,
    /// What went wrong.
    pub reason: String,
}

impl ConvertError {
    fn outbound(tag: NativeTag, value: &SqlValue, reason: impl Into<String>) -> Self {
        Self {
            direction: Direction::Outbound,
            tag,
            value: format!("{value:?}"),
            reason: reason.into(),
        }
    }

    fn inbound(tag: NativeTag, value: &DriverValue, reason: impl Into<String>) -> Self {
        Self {
            direction: Direction::Inbound,
            tag,
            value: format!("{value:?}"),
            reason: reason.into(),
        }
    }
}

type Result<T> = std::result::Result<T, ConvertError>;

/// How string dates are normalized before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateMode {
    /// Keep only the 10-character date portion, discarding time-of-day.
    #[default]
    DateOnly,
    /// Preserve the historical 24-character form (date plus time-of-day,
    /// fraction already truncated); the time part is then dropped at the
    /// date boundary.
    Legacy,
}

/// Maximum characters of a timestamp string the engine will accept:
/// `YYYY-MM-DD HH:MM:SS.FFFF` — four fractional digits.
const TIMESTAMP_MAX_CHARS: usize = 24;

/// The converter tables attached to a connection at construction.
#[derive(Debug, Clone, Copy)]
pub struct ConverterTable {
    charset: Charset,
    date_mode: DateMode,
}

impl ConverterTable {
    /// Builds the table for the connection's charset with the default
    /// date mode.
    #[must_use]
    pub const fn new(charset: Charset) -> Self {
        Self {
            charset,
            date_mode: DateMode::DateOnly,
        }
    }

    /// Overrides the date normalization mode.
    #[must_use]
    pub const fn with_date_mode(mut self, mode: DateMode) -> Self {
        self.date_mode = mode;
        self
    }

    /// The charset code negotiated with the driver.
    #[must_use]
    pub const fn charset_code(&self) -> u8 {
        self.charset.code()
    }

    /// Converts a semantic value to the driver representation for `tag`.
    pub fn outbound(&self, tag: NativeTag, value: &SqlValue) -> Result<DriverValue> {
        if matches!(value, SqlValue::Null) {
            return Ok(DriverValue::Null);
        }
        match tag {
            NativeTag::Date => self.date_out(value),
            NativeTag::Time => Self::time_out(value),
            NativeTag::Timestamp => Self::timestamp_out(value),
            NativeTag::Fixed => Self::fixed_out(value, None),
            NativeTag::Text => Self::ascii_out(value),
            NativeTag::TextUnicode => self.unicode_out(tag, value),
            NativeTag::Blob => self.blob_out(value),
            NativeTag::Boolean => Self::boolean_out(value),
        }
    }

    /// Converts a semantic value to a FIXED driver value at an explicit
    /// column scale (truncating toward zero when the value carries more
    /// fractional digits).
    pub fn outbound_fixed(&self, value: &SqlValue, scale: u32) -> Result<DriverValue> {
        if matches!(value, SqlValue::Null) {
            return Ok(DriverValue::Null);
        }
        Self::fixed_out(value, Some(scale))
    }

    /// Converts a driver value that carries no registered tag (plain
    /// integers, doubles, raw bytes). These map structurally.
    pub fn inbound_untagged(&self, value: &DriverValue) -> Result<SqlValue> {
        match value {
            DriverValue::Null => Ok(SqlValue::Null),
            DriverValue::Int(n) => Ok(SqlValue::Int(*n)),
            DriverValue::Double(f) => Ok(SqlValue::Float(*f)),
            DriverValue::Bytes(b) => Ok(SqlValue::Blob(b.clone())),
            DriverValue::Fixed { .. } => Self::fixed_in(value),
            DriverValue::Date { .. } => Self::date_in(value),
            DriverValue::Time { .. } => Self::time_in(value),
            DriverValue::Timestamp { .. } => Self::timestamp_in(value),
        }
    }

    /// Converts a driver value back to the semantic representation.
    pub fn inbound(&self, tag: NativeTag, value: &DriverValue) -> Result<SqlValue> {
        if matches!(value, DriverValue::Null) {
            return Ok(SqlValue::Null);
        }
        match tag {
            NativeTag::Date => Self::date_in(value),
            NativeTag::Time => Self::time_in(value),
            NativeTag::Timestamp => Self::timestamp_in(value),
            NativeTag::Fixed => Self::fixed_in(value),
            NativeTag::Text => Self::ascii_in(value),
            NativeTag::TextUnicode | NativeTag::Blob => Self::unicode_in(tag, value),
            NativeTag::Boolean => Self::boolean_in(value),
        }
    }

    // Outbound halves.

    fn date_out(&self, value: &SqlValue) -> Result<DriverValue> {
        let date = match value {
            SqlValue::Date(d) => *d,
            SqlValue::Timestamp(ts) => ts.date(),
            SqlValue::Text(s) => {
                let normalized = s.replace('T', " ");
                match self.date_mode {
                    DateMode::DateOnly => {
                        let head = truncate_name(&normalized, 10);
                        NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(|e| {
                            ConvertError::outbound(NativeTag::Date, value, e.to_string())
                        })?
                    }
                    DateMode::Legacy => {
                        let head = truncate_name(&normalized, TIMESTAMP_MAX_CHARS);
                        parse_timestamp_str(head)
                            .map_err(|e| ConvertError::outbound(NativeTag::Date, value, e))?
                            .date()
                    }
                }
            }
            other => {
                return Err(ConvertError::outbound(
                    NativeTag::Date,
                    other,
                    "expected a date, timestamp or string",
                ));
            }
        };
        Ok(DriverValue::Date {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        })
    }

    fn time_out(value: &SqlValue) -> Result<DriverValue> {
        let time = match value {
            SqlValue::Time(t) => *t,
            // A full timestamp loses its date half here, matching the
            // engine's TIME column semantics.
            SqlValue::Timestamp(ts) => ts.time(),
            SqlValue::Text(s) => NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
                .map_err(|e| ConvertError::outbound(NativeTag::Time, value, e.to_string()))?,
            other => {
                return Err(ConvertError::outbound(
                    NativeTag::Time,
                    other,
                    "expected a time, timestamp or string",
                ));
            }
        };
        Ok(DriverValue::Time {
            hour: time.hour(),
            minute: time.minute(),
            second: time.second(),
            fraction: (time.nanosecond() / 1000) / 100,
        })
    }

    fn timestamp_out(value: &SqlValue) -> Result<DriverValue> {
        let ts = match value {
            SqlValue::Timestamp(ts) => *ts,
            SqlValue::Date(d) => d.and_hms_opt(0, 0, 0).unwrap_or_default(),
            SqlValue::Text(s) => {
                // More than 4 fractional digits would be rejected by the
                // engine; the string is cut, not rounded.
                let normalized = s.replace('T', " ");
                let head = truncate_name(&normalized, TIMESTAMP_MAX_CHARS);
                parse_timestamp_str(head)
                    .map_err(|e| ConvertError::outbound(NativeTag::Timestamp, value, e))?
            }
            other => {
                return Err(ConvertError::outbound(
                    NativeTag::Timestamp,
                    other,
                    "expected a timestamp, date or string",
                ));
            }
        };
        Ok(DriverValue::Timestamp {
            year: ts.year(),
            month: ts.month(),
            day: ts.day(),
            hour: ts.hour(),
            minute: ts.minute(),
            second: ts.second(),
            fraction: (ts.nanosecond() / 1000) / 100,
        })
    }

    fn fixed_out(value: &SqlValue, scale: Option<u32>) -> Result<DriverValue> {
        let decimal = match value {
            SqlValue::Decimal(d) => *d,
            // Strings go through an exact decimal parse; converting via
            // binary floats would corrupt the low digits.
            SqlValue::Text(s) => s
                .parse::<Decimal>()
                .map_err(|e| ConvertError::outbound(NativeTag::Fixed, value, e.to_string()))?,
            SqlValue::Int(n) => Decimal::from(*n),
            other => {
                return Err(ConvertError::outbound(
                    NativeTag::Fixed,
                    other,
                    "expected a decimal, integer or numeric string",
                ));
            }
        };

        let scale = scale.unwrap_or_else(|| decimal.scale());
        if scale > 28 {
            return Err(ConvertError::outbound(
                NativeTag::Fixed,
                value,
                format!("scale {scale} exceeds supported precision"),
            ));
        }
        let truncated = decimal.trunc_with_scale(scale);
        let shift = 10_i128.pow(scale - truncated.scale());
        let unscaled = truncated.mantissa().checked_mul(shift).ok_or_else(|| {
            ConvertError::outbound(NativeTag::Fixed, value, "unscaled value overflows")
        })?;
        Ok(DriverValue::Fixed {
            value: unscaled,
            scale,
        })
    }

    fn ascii_out(value: &SqlValue) -> Result<DriverValue> {
        match value {
            SqlValue::Text(s) if s.is_ascii() => Ok(DriverValue::Bytes(s.clone().into_bytes())),
            SqlValue::Text(_) => Err(ConvertError::outbound(
                NativeTag::Text,
                value,
                "non-ASCII data in a single-byte column",
            )),
            other => Err(ConvertError::outbound(
                NativeTag::Text,
                other,
                "expected a string",
            )),
        }
    }

    fn unicode_out(&self, tag: NativeTag, value: &SqlValue) -> Result<DriverValue> {
        match value {
            SqlValue::Text(s) => {
                if self.charset == Charset::UnicodeFss {
                    // UNICODE_FSS stores at most 3 bytes per character;
                    // anything outside the BMP needs 4.
                    if let Some(c) = s.chars().find(|c| (*c as u32) > 0xFFFF) {
                        return Err(ConvertError::outbound(
                            tag,
                            value,
                            format!("U+{:04X} is not representable in UNICODE_FSS", c as u32),
                        ));
                    }
                }
                Ok(DriverValue::Bytes(s.clone().into_bytes()))
            }
            other => Err(ConvertError::outbound(tag, other, "expected a string")),
        }
    }

    fn blob_out(&self, value: &SqlValue) -> Result<DriverValue> {
        match value {
            SqlValue::Text(_) => self.unicode_out(NativeTag::Blob, value),
            SqlValue::Blob(b) => Ok(DriverValue::Bytes(b.clone())),
            other => Err(ConvertError::outbound(
                NativeTag::Blob,
                other,
                "expected a string or blob",
            )),
        }
    }

    fn boolean_out(value: &SqlValue) -> Result<DriverValue> {
        match value {
            SqlValue::Bool(b) => Ok(DriverValue::Int(i64::from(*b))),
            SqlValue::Int(n @ (0 | 1)) => Ok(DriverValue::Int(*n)),
            other => Err(ConvertError::outbound(
                NativeTag::Boolean,
                other,
                "expected a boolean or 0/1",
            )),
        }
    }

    // Inbound halves.

    fn date_in(value: &DriverValue) -> Result<SqlValue> {
        match value {
            DriverValue::Date { year, month, day } => NaiveDate::from_ymd_opt(*year, *month, *day)
                .map(SqlValue::Date)
                .ok_or_else(|| {
                    ConvertError::inbound(NativeTag::Date, value, "invalid calendar date")
                }),
            other => Err(ConvertError::inbound(
                NativeTag::Date,
                other,
                "expected a native date",
            )),
        }
    }

    fn time_in(value: &DriverValue) -> Result<SqlValue> {
        match value {
            DriverValue::Time {
                hour,
                minute,
                second,
                fraction,
            } => NaiveTime::from_hms_micro_opt(*hour, *minute, *second, fraction * 100)
                .map(SqlValue::Time)
                .ok_or_else(|| {
                    ConvertError::inbound(NativeTag::Time, value, "invalid time of day")
                }),
            other => Err(ConvertError::inbound(
                NativeTag::Time,
                other,
                "expected a native time",
            )),
        }
    }

    fn timestamp_in(value: &DriverValue) -> Result<SqlValue> {
        match value {
            DriverValue::Timestamp {
                year,
                month,
                day,
                hour,
                minute,
                second,
                fraction,
            } => NaiveDate::from_ymd_opt(*year, *month, *day)
                .and_then(|d| d.and_hms_micro_opt(*hour, *minute, *second, fraction * 100))
                .map(SqlValue::Timestamp)
                .ok_or_else(|| {
                    ConvertError::inbound(NativeTag::Timestamp, value, "invalid timestamp")
                }),
            other => Err(ConvertError::inbound(
                NativeTag::Timestamp,
                other,
                "expected a native timestamp",
            )),
        }
    }

    fn fixed_in(value: &DriverValue) -> Result<SqlValue> {
        match value {
            DriverValue::Fixed {
                value: unscaled,
                scale,
            } => {
                if *scale > 28 {
                    return Err(ConvertError::inbound(
                        NativeTag::Fixed,
                        value,
                        format!("scale {scale} exceeds supported precision"),
                    ));
                }
                Ok(SqlValue::Decimal(Decimal::from_i128_with_scale(
                    *unscaled, *scale,
                )))
            }
            other => Err(ConvertError::inbound(
                NativeTag::Fixed,
                other,
                "expected a native fixed-point pair",
            )),
        }
    }

    fn ascii_in(value: &DriverValue) -> Result<SqlValue> {
        match value {
            DriverValue::Bytes(b) if b.is_ascii() => {
                // Safe by the ascii check, but stay in fallible code.
                String::from_utf8(b.clone())
                    .map(SqlValue::Text)
                    .map_err(|e| ConvertError::inbound(NativeTag::Text, value, e.to_string()))
            }
            DriverValue::Bytes(_) => Err(ConvertError::inbound(
                NativeTag::Text,
                value,
                "non-ASCII bytes in a single-byte column",
            )),
            other => Err(ConvertError::inbound(
                NativeTag::Text,
                other,
                "expected bytes",
            )),
        }
    }

    fn unicode_in(tag: NativeTag, value: &DriverValue) -> Result<SqlValue> {
        match value {
            DriverValue::Bytes(b) => String::from_utf8(b.clone())
                .map(SqlValue::Text)
                .map_err(|e| ConvertError::inbound(tag, value, e.to_string())),
            other => Err(ConvertError::inbound(tag, other, "expected bytes")),
        }
    }

    fn boolean_in(value: &DriverValue) -> Result<SqlValue> {
        match value {
            DriverValue::Int(0) => Ok(SqlValue::Bool(false)),
            DriverValue::Int(1) => Ok(SqlValue::Bool(true)),
            // Values outside 0/1 slipped past the CHECK constraint (or the
            // column predates it); they pass through untouched.
            DriverValue::Int(n) => Ok(SqlValue::Int(*n)),
            other => Err(ConvertError::inbound(
                NativeTag::Boolean,
                other,
                "expected a native integer",
            )),
        }
    }
}

/// Parses `YYYY-MM-DD[ HH:MM:SS[.FFFF]]` into a timestamp.
fn parse_timestamp_str(s: &str) -> std::result::Result<NaiveDateTime, String> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ConverterTable {
        ConverterTable::new(Charset::UnicodeFss)
    }

    #[test]
    fn test_null_passes_both_ways() {
        let t = table();
        for tag in [
            NativeTag::Date,
            NativeTag::Time,
            NativeTag::Timestamp,
            NativeTag::Fixed,
            NativeTag::Text,
            NativeTag::TextUnicode,
            NativeTag::Blob,
            NativeTag::Boolean,
        ] {
            assert_eq!(t.outbound(tag, &SqlValue::Null).unwrap(), DriverValue::Null);
            assert_eq!(t.inbound(tag, &DriverValue::Null).unwrap(), SqlValue::Null);
        }
    }

    #[test]
    fn test_date_round_trip() {
        let t = table();
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let native = t.outbound(NativeTag::Date, &SqlValue::Date(date)).unwrap();
        assert_eq!(
            native,
            DriverValue::Date {
                year: 2024,
                month: 2,
                day: 29
            }
        );
        assert_eq!(
            t.inbound(NativeTag::Date, &native).unwrap(),
            SqlValue::Date(date)
        );
    }

    #[test]
    fn test_date_from_string_keeps_date_portion() {
        let t = table();
        let native = t
            .outbound(
                NativeTag::Date,
                &SqlValue::Text(String::from("2024-01-15 10:30:00.123456")),
            )
            .unwrap();
        assert_eq!(
            native,
            DriverValue::Date {
                year: 2024,
                month: 1,
                day: 15
            }
        );
    }

    #[test]
    fn test_date_legacy_mode_parses_full_form() {
        let t = table().with_date_mode(DateMode::Legacy);
        let native = t
            .outbound(
                NativeTag::Date,
                &SqlValue::Text(String::from("2024-01-15 10:30:00.123456")),
            )
            .unwrap();
        assert_eq!(
            native,
            DriverValue::Date {
                year: 2024,
                month: 1,
                day: 15
            }
        );
    }

    #[test]
    fn test_timestamp_string_truncated_to_four_fraction_digits() {
        let t = table();
        let native = t
            .outbound(
                NativeTag::Timestamp,
                &SqlValue::Text(String::from("2024-01-15 10:30:00.123456")),
            )
            .unwrap();
        // .123456 is cut to .1234, never rounded.
        assert_eq!(
            native,
            DriverValue::Timestamp {
                year: 2024,
                month: 1,
                day: 15,
                hour: 10,
                minute: 30,
                second: 0,
                fraction: 1234
            }
        );
    }

    #[test]
    fn test_timestamp_round_trip_at_engine_precision() {
        let t = table();
        let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_micro_opt(10, 30, 0, 123_400)
            .unwrap();
        let native = t
            .outbound(NativeTag::Timestamp, &SqlValue::Timestamp(ts))
            .unwrap();
        assert_eq!(
            t.inbound(NativeTag::Timestamp, &native).unwrap(),
            SqlValue::Timestamp(ts)
        );
    }

    #[test]
    fn test_timestamp_microseconds_truncate() {
        let t = table();
        let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_micro_opt(10, 30, 0, 123_456)
            .unwrap();
        let native = t
            .outbound(NativeTag::Timestamp, &SqlValue::Timestamp(ts))
            .unwrap();
        match native {
            DriverValue::Timestamp { fraction, .. } => assert_eq!(fraction, 1234),
            other => panic!("unexpected driver value: {other:?}"),
        }
    }

    #[test]
    fn test_time_from_timestamp_keeps_time_of_day() {
        let t = table();
        let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 45)
            .unwrap();
        let native = t.outbound(NativeTag::Time, &SqlValue::Timestamp(ts)).unwrap();
        assert_eq!(
            native,
            DriverValue::Time {
                hour: 10,
                minute: 30,
                second: 45,
                fraction: 0
            }
        );
    }

    #[test]
    fn test_time_round_trip() {
        let t = table();
        let time = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_900).unwrap();
        let native = t.outbound(NativeTag::Time, &SqlValue::Time(time)).unwrap();
        assert_eq!(
            t.inbound(NativeTag::Time, &native).unwrap(),
            SqlValue::Time(time)
        );
    }

    #[test]
    fn test_fixed_string_parses_exactly() {
        let t = table();
        // 0.1 has no exact binary float representation; the decimal path
        // must preserve it.
        let native = t
            .outbound_fixed(&SqlValue::Text(String::from("0.1")), 2)
            .unwrap();
        assert_eq!(native, DriverValue::Fixed { value: 10, scale: 2 });
    }

    #[test]
    fn test_fixed_round_trip_at_scale() {
        let t = table();
        let decimal: Decimal = "123.45".parse().unwrap();
        let native = t.outbound_fixed(&SqlValue::Decimal(decimal), 2).unwrap();
        assert_eq!(
            native,
            DriverValue::Fixed {
                value: 12345,
                scale: 2
            }
        );
        assert_eq!(
            t.inbound(NativeTag::Fixed, &native).unwrap(),
            SqlValue::Decimal(decimal)
        );
    }

    #[test]
    fn test_fixed_truncates_extra_digits_toward_zero() {
        let t = table();
        let decimal: Decimal = "-1.119".parse().unwrap();
        let native = t.outbound_fixed(&SqlValue::Decimal(decimal), 2).unwrap();
        assert_eq!(native, DriverValue::Fixed { value: -111, scale: 2 });
    }

    #[test]
    fn test_fixed_rejects_garbage() {
        let t = table();
        let err = t
            .outbound(NativeTag::Fixed, &SqlValue::Text(String::from("12f.3")))
            .unwrap_err();
        assert_eq!(err.tag, NativeTag::Fixed);
        assert_eq!(err.direction, Direction::Outbound);
    }

    #[test]
    fn test_ascii_rejects_non_ascii() {
        let t = table();
        let err = t
            .outbound(NativeTag::Text, &SqlValue::Text(String::from("café")))
            .unwrap_err();
        assert_eq!(err.tag, NativeTag::Text);

        let err = t
            .inbound(NativeTag::Text, &DriverValue::Bytes(vec![0xC3, 0xA9]))
            .unwrap_err();
        assert_eq!(err.direction, Direction::Inbound);
    }

    #[test]
    fn test_ascii_round_trip() {
        let t = table();
        let native = t
            .outbound(NativeTag::Text, &SqlValue::Text(String::from("plain")))
            .unwrap();
        assert_eq!(
            t.inbound(NativeTag::Text, &native).unwrap(),
            SqlValue::Text(String::from("plain"))
        );
    }

    #[test]
    fn test_unicode_round_trip() {
        let t = table();
        let text = SqlValue::Text(String::from("caféニャン"));
        let native = t.outbound(NativeTag::TextUnicode, &text).unwrap();
        assert_eq!(t.inbound(NativeTag::TextUnicode, &native).unwrap(), text);
    }

    #[test]
    fn test_unicode_fss_rejects_astral_plane() {
        let t = ConverterTable::new(Charset::UnicodeFss);
        let err = t
            .outbound(NativeTag::TextUnicode, &SqlValue::Text(String::from("🔥")))
            .unwrap_err();
        assert!(err.reason.contains("UNICODE_FSS"));

        // UTF8 connections take the same string.
        let utf8 = ConverterTable::new(Charset::Utf8);
        assert!(utf8
            .outbound(NativeTag::TextUnicode, &SqlValue::Text(String::from("🔥")))
            .is_ok());
    }

    #[test]
    fn test_blob_uses_unicode_codec() {
        let t = table();
        let text = SqlValue::Text(String::from("long text content"));
        let native = t.outbound(NativeTag::Blob, &text).unwrap();
        assert_eq!(t.inbound(NativeTag::Blob, &native).unwrap(), text);
    }

    #[test]
    fn test_inbound_invalid_utf8_is_typed() {
        let t = table();
        let err = t
            .inbound(NativeTag::TextUnicode, &DriverValue::Bytes(vec![0xFF, 0xFE]))
            .unwrap_err();
        assert_eq!(err.tag, NativeTag::TextUnicode);
    }

    #[test]
    fn test_boolean_mapping() {
        let t = table();
        assert_eq!(
            t.outbound(NativeTag::Boolean, &SqlValue::Bool(true)).unwrap(),
            DriverValue::Int(1)
        );
        assert_eq!(
            t.inbound(NativeTag::Boolean, &DriverValue::Int(0)).unwrap(),
            SqlValue::Bool(false)
        );
        assert_eq!(
            t.inbound(NativeTag::Boolean, &DriverValue::Int(1)).unwrap(),
            SqlValue::Bool(true)
        );
        // Out-of-domain smallints pass through untouched.
        assert_eq!(
            t.inbound(NativeTag::Boolean, &DriverValue::Int(5)).unwrap(),
            SqlValue::Int(5)
        );
    }

    #[test]
    fn test_charset_code_follows_connection_charset() {
        assert_eq!(ConverterTable::new(Charset::UnicodeFss).charset_code(), 3);
        assert_eq!(ConverterTable::new(Charset::Utf8).charset_code(), 4);
    }
}
