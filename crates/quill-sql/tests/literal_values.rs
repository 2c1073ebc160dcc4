use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use quill_core::{
    driver::{Capability, StringEscaping},
    stmt::{Expr, Value},
};
use quill_sql::Serializer;

fn pg_literal(value: impl Into<Value>) -> String {
    Serializer::postgresql(&Capability::POSTGRESQL)
        .literal(&Expr::Value(value.into()))
        .unwrap()
}

fn sqlite_literal(value: impl Into<Value>) -> String {
    Serializer::sqlite(&Capability::SQLITE)
        .literal(&Expr::Value(value.into()))
        .unwrap()
}

fn mysql_literal(value: impl Into<Value>) -> quill_core::Result<String> {
    Serializer::mysql(&Capability::MYSQL).literal(&Expr::Value(value.into()))
}

// ---------------------------------------------------------------------------
// Strings: one escaping convention at a time
// ---------------------------------------------------------------------------

#[test]
fn standard_escaping_doubles_quotes() {
    assert_eq!(pg_literal("it's"), "'it''s'");
    // Backslashes pass through untouched under standard escaping
    assert_eq!(pg_literal(r"a\b"), r"'a\b'");
}

#[test]
fn backslash_escaping() {
    assert_eq!(mysql_literal("it's").unwrap(), "'it''s'");
    assert_eq!(mysql_literal(r"a\b").unwrap(), r"'a\\b'");
    assert_eq!(mysql_literal("a\0b").unwrap(), r"'a\0b'");
}

#[test]
fn n_prefix_escaping() {
    let mut capability = Capability::POSTGRESQL;
    capability.string_escaping = StringEscaping::NPrefix;
    let sql = Serializer::postgresql(&capability)
        .literal(&Expr::from("it's"))
        .unwrap();
    assert_eq!(sql, "N'it''s'");
}

#[test]
fn nul_byte_rejected_outside_backslash_convention() {
    let err = Serializer::postgresql(&Capability::POSTGRESQL)
        .literal(&Expr::from("a\0b"))
        .unwrap_err();
    assert!(err.is_build());
}

#[test]
fn unknown_convention_name_fails_fast() {
    let err = StringEscaping::from_name("percent-doubling").unwrap_err();
    assert!(err.is_build());
    assert_eq!(StringEscaping::from_name("standard").unwrap(), StringEscaping::Standard);
    assert_eq!(
        StringEscaping::from_name("backslash").unwrap(),
        StringEscaping::Backslash
    );
    assert_eq!(
        StringEscaping::from_name("n-prefix").unwrap(),
        StringEscaping::NPrefix
    );
}

// Parse a literal back the way the database would, checking the round trip
// for quote-heavy and backslash-heavy inputs.
fn unescape(literal: &str, escaping: StringEscaping) -> String {
    let body = match escaping {
        StringEscaping::NPrefix => &literal[2..literal.len() - 1],
        _ => &literal[1..literal.len() - 1],
    };

    let mut out = String::new();
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match (ch, escaping) {
            ('\'', _) => {
                // doubled quote
                chars.next();
                out.push('\'');
            }
            ('\\', StringEscaping::Backslash) => match chars.next() {
                Some('\\') => out.push('\\'),
                Some('0') => out.push('\0'),
                Some(other) => out.push(other),
                None => {}
            },
            (ch, _) => out.push(ch),
        }
    }
    out
}

#[test]
fn escaping_round_trips() {
    let samples = [
        "plain",
        "it's",
        "''double''",
        r"back\slash",
        r"mixed '\' case",
        "",
    ];

    for sample in samples {
        assert_eq!(
            unescape(&pg_literal(sample), StringEscaping::Standard),
            sample,
            "standard round trip of {sample:?}"
        );
        assert_eq!(
            unescape(&mysql_literal(sample).unwrap(), StringEscaping::Backslash),
            sample,
            "backslash round trip of {sample:?}"
        );
    }

    // NUL bytes only round-trip under backslash escaping
    let with_nul = "a\0b";
    assert_eq!(
        unescape(&mysql_literal(with_nul).unwrap(), StringEscaping::Backslash),
        with_nul
    );
}

// ---------------------------------------------------------------------------
// Numerics
// ---------------------------------------------------------------------------

#[test]
fn decimals_render_exact_digits() {
    assert_eq!(pg_literal(Decimal::new(12345, 2)), "123.45");
    assert_eq!(pg_literal(Decimal::new(-5, 1)), "-0.5");
    // A value that binary floats cannot represent exactly
    assert_eq!(pg_literal(Decimal::new(1, 1)), "0.1");
}

#[test]
fn finite_floats_render_plain() {
    assert_eq!(pg_literal(2.5f64), "2.5");
    assert_eq!(pg_literal(-0.25f64), "-0.25");
}

#[test]
fn nonfinite_floats_per_dialect() {
    assert_eq!(
        pg_literal(f64::NAN),
        "CAST('NaN' AS double precision)"
    );
    assert_eq!(
        pg_literal(f64::INFINITY),
        "CAST('Infinity' AS double precision)"
    );
    assert_eq!(
        pg_literal(f64::NEG_INFINITY),
        "CAST('-Infinity' AS double precision)"
    );

    assert_eq!(sqlite_literal(f64::INFINITY), "9e999");
    assert_eq!(sqlite_literal(f64::NEG_INFINITY), "-9e999");
    assert_eq!(sqlite_literal(f64::NAN), "NULL");

    // MySQL has no spelling at all; never silently coerce
    assert!(mysql_literal(f64::NAN).unwrap_err().is_build());
    assert!(mysql_literal(f64::INFINITY).unwrap_err().is_build());
}

// ---------------------------------------------------------------------------
// Booleans, bytes, null
// ---------------------------------------------------------------------------

#[test]
fn booleans_per_dialect() {
    assert_eq!(pg_literal(true), "TRUE");
    assert_eq!(pg_literal(false), "FALSE");
    assert_eq!(sqlite_literal(true), "1");
    assert_eq!(sqlite_literal(false), "0");
}

#[test]
fn bytes_per_dialect() {
    let bytes = vec![0xde, 0xad, 0xbe, 0xef];
    assert_eq!(pg_literal(bytes.clone()), r"'\xdeadbeef'");
    assert_eq!(sqlite_literal(bytes), "X'deadbeef'");
}

#[test]
fn null_renders_bare() {
    assert_eq!(pg_literal(Value::Null), "NULL");
}

// ---------------------------------------------------------------------------
// Timestamps: precision and half-up rounding
// ---------------------------------------------------------------------------

fn ts(nanos: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 17)
        .unwrap()
        .and_hms_nano_opt(10, 30, 59, nanos)
        .unwrap()
}

#[test]
fn timestamp_at_postgres_precision() {
    // PostgreSQL stores microseconds; 0.1234565 rounds half-up to .123457
    assert_eq!(
        pg_literal(ts(123_456_500)),
        "'2024-05-17 10:30:59.123457'"
    );
    assert_eq!(
        pg_literal(ts(123_456_499)),
        "'2024-05-17 10:30:59.123456'"
    );
}

#[test]
fn timestamp_at_millisecond_precision() {
    // SQLite capability keeps three digits
    assert_eq!(
        sqlite_literal(ts(123_500_000)),
        "'2024-05-17 10:30:59.124'"
    );
    assert_eq!(
        sqlite_literal(ts(123_499_999)),
        "'2024-05-17 10:30:59.123'"
    );
}

#[test]
fn timestamp_rounding_carries_into_seconds() {
    let mut capability = Capability::POSTGRESQL;
    capability.timestamp_precision = 0;
    let sql = Serializer::postgresql(&capability)
        .literal(&Expr::Value(ts(500_000_000).into()))
        .unwrap();
    assert_eq!(sql, "'2024-05-17 10:31:00'");
}

#[test]
fn date_renders_iso() {
    let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
    assert_eq!(pg_literal(date), "'2024-05-17'");
}
