//! Round-trip properties of the conversion pipeline.
//!
//! Outbound-then-inbound must be the identity for every tag, except the
//! documented lossy cases (timestamp fractions beyond 4 digits, fixed-point
//! digits beyond the column scale).

use chrono::{NaiveDate, NaiveTime};
use ember_sql_core::SqlValue;
use ember_sql_firebird::{Charset, ConverterTable, NativeTag};
use rust_decimal::Decimal;

fn table() -> ConverterTable {
    ConverterTable::new(Charset::UnicodeFss)
}

#[test]
fn dates_round_trip_across_the_supported_range() {
    let t = table();
    let dates = [
        NaiveDate::from_ymd_opt(1, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(1899, 12, 31).unwrap(),
        NaiveDate::from_ymd_opt(2000, 2, 29).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        NaiveDate::from_ymd_opt(9999, 12, 31).unwrap(),
    ];
    for date in dates {
        let value = SqlValue::Date(date);
        let native = t.outbound(NativeTag::Date, &value).unwrap();
        assert_eq!(t.inbound(NativeTag::Date, &native).unwrap(), value);
    }
}

#[test]
fn times_round_trip_at_engine_precision() {
    let t = table();
    let times = [
        NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        NaiveTime::from_hms_micro_opt(12, 30, 45, 500_000).unwrap(),
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_900).unwrap(),
    ];
    for time in times {
        let value = SqlValue::Time(time);
        let native = t.outbound(NativeTag::Time, &value).unwrap();
        assert_eq!(t.inbound(NativeTag::Time, &native).unwrap(), value);
    }
}

#[test]
fn timestamps_round_trip_at_engine_precision() {
    let t = table();
    let timestamps = [
        NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        NaiveDate::from_ymd_opt(2024, 6, 30)
            .unwrap()
            .and_hms_micro_opt(23, 59, 59, 123_400)
            .unwrap(),
    ];
    for ts in timestamps {
        let value = SqlValue::Timestamp(ts);
        let native = t.outbound(NativeTag::Timestamp, &value).unwrap();
        assert_eq!(t.inbound(NativeTag::Timestamp, &native).unwrap(), value);
    }
}

#[test]
fn decimals_round_trip_at_declared_scale() {
    let t = table();
    let cases: [(&str, u32); 6] = [
        ("0", 0),
        ("0.01", 2),
        ("-999999.99", 2),
        ("123456789.1234", 4),
        ("0.0001", 4),
        ("-0.5", 1),
    ];
    for (text, scale) in cases {
        let decimal: Decimal = text.parse().unwrap();
        let native = t
            .outbound_fixed(&SqlValue::Decimal(decimal), scale)
            .unwrap();
        assert_eq!(
            t.inbound(NativeTag::Fixed, &native).unwrap(),
            SqlValue::Decimal(decimal),
            "round trip failed for {text} at scale {scale}"
        );
    }
}

#[test]
fn unicode_strings_round_trip_under_both_charsets() {
    let samples = ["", "plain ascii", "çédille", "数据库", "mixed: é数"];
    for charset in [Charset::UnicodeFss, Charset::Utf8] {
        let t = ConverterTable::new(charset);
        for sample in samples {
            let value = SqlValue::Text(String::from(sample));
            let native = t.outbound(NativeTag::TextUnicode, &value).unwrap();
            assert_eq!(t.inbound(NativeTag::TextUnicode, &native).unwrap(), value);

            let native = t.outbound(NativeTag::Blob, &value).unwrap();
            assert_eq!(t.inbound(NativeTag::Blob, &native).unwrap(), value);
        }
    }
}

#[test]
fn booleans_round_trip() {
    let t = table();
    for b in [true, false] {
        let value = SqlValue::Bool(b);
        let native = t.outbound(NativeTag::Boolean, &value).unwrap();
        assert_eq!(t.inbound(NativeTag::Boolean, &native).unwrap(), value);
    }
}
