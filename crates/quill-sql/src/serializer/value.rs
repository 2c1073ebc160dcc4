use super::{Flavor, Formatter, Params, ToSql};

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use quill_core::{
    driver::StringEscaping,
    stmt::Value,
    Error,
};

impl ToSql for &Value {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            // A list always renders inline as a parenthesized member list
            Value::List(items) => {
                let mut s = "";
                f.dst.push('(');
                for item in items {
                    fmt!(f, s, item);
                    s = ", ";
                }
                f.dst.push(')');
            }
            value => match f.params.push(value) {
                Some(placeholder) => placeholder.to_sql(f),
                None => write_literal(value, f),
            },
        }
    }
}

/// Write a dialect-correct literal for a scalar value.
fn write_literal<P: Params>(value: &Value, f: &mut Formatter<'_, P>) {
    use std::fmt::Write;

    match value {
        Value::Null => f.dst.push_str("NULL"),
        Value::Bool(v) => {
            let text = match (f.serializer.flavor(), v) {
                // SQLite has no boolean literals
                (Flavor::Sqlite, true) => "1",
                (Flavor::Sqlite, false) => "0",
                (_, true) => "TRUE",
                (_, false) => "FALSE",
            };
            f.dst.push_str(text);
        }
        Value::I64(v) => write!(f.dst, "{v}").unwrap(),
        Value::F64(v) => write_float(*v, f),
        Value::Decimal(v) => write!(f.dst, "{v}").unwrap(),
        Value::String(v) => write_string(v, f),
        Value::Bytes(v) => write_bytes(v, f),
        Value::Date(v) => {
            write!(f.dst, "'{}'", v.format("%Y-%m-%d")).unwrap();
        }
        Value::Time(v) => {
            f.dst.push('\'');
            write_time(*v, f.serializer.capability().timestamp_precision, f.dst);
            f.dst.push('\'');
        }
        Value::DateTime(v) => write_timestamp(*v, f),
        Value::DateTimeUtc(v) => write_timestamp(v.naive_utc(), f),
        Value::List(_) => unreachable!("lists are rendered by the ToSql impl"),
    }
}

/// Floats render as plain numerics when finite. Non-finite values have no
/// universal SQL spelling: PostgreSQL accepts quoted special values with a
/// cast, SQLite spells infinity as an out-of-range literal and stores NaN
/// as NULL, and MySQL cannot represent them at all.
fn write_float<P: Params>(v: f64, f: &mut Formatter<'_, P>) {
    use std::fmt::Write;

    if v.is_finite() {
        write!(f.dst, "{v}").unwrap();
        return;
    }

    match f.serializer.flavor() {
        Flavor::Postgresql => {
            let text = if v.is_nan() {
                "NaN"
            } else if v > 0.0 {
                "Infinity"
            } else {
                "-Infinity"
            };
            write!(f.dst, "CAST('{text}' AS double precision)").unwrap();
        }
        Flavor::Sqlite => {
            if v.is_nan() {
                f.dst.push_str("NULL");
            } else if v > 0.0 {
                f.dst.push_str("9e999");
            } else {
                f.dst.push_str("-9e999");
            }
        }
        Flavor::Mysql => {
            f.fail(Error::build(format!(
                "MySQL has no literal form for the float value {v}"
            )));
        }
    }
}

fn write_string<P: Params>(v: &str, f: &mut Formatter<'_, P>) {
    let escaping = f.serializer.capability().string_escaping;

    if v.contains('\0') && escaping != StringEscaping::Backslash {
        f.fail(Error::build(
            "string contains a NUL byte, which this escaping convention cannot represent",
        ));
        return;
    }

    if escaping == StringEscaping::NPrefix {
        f.dst.push('N');
    }
    f.dst.push('\'');
    for ch in v.chars() {
        match (ch, escaping) {
            ('\'', _) => f.dst.push_str("''"),
            ('\\', StringEscaping::Backslash) => f.dst.push_str("\\\\"),
            ('\0', StringEscaping::Backslash) => f.dst.push_str("\\0"),
            (ch, _) => f.dst.push(ch),
        }
    }
    f.dst.push('\'');
}

fn write_bytes<P: Params>(v: &[u8], f: &mut Formatter<'_, P>) {
    use std::fmt::Write;

    match f.serializer.flavor() {
        Flavor::Postgresql => {
            f.dst.push_str("'\\x");
            for byte in v {
                write!(f.dst, "{byte:02x}").unwrap();
            }
            f.dst.push('\'');
        }
        Flavor::Sqlite | Flavor::Mysql => {
            f.dst.push_str("X'");
            for byte in v {
                write!(f.dst, "{byte:02x}").unwrap();
            }
            f.dst.push('\'');
        }
    }
}

fn write_timestamp<P: Params>(v: NaiveDateTime, f: &mut Formatter<'_, P>) {
    let precision = f.serializer.capability().timestamp_precision;
    let rounded = round_to_precision(v, precision);

    f.dst.push('\'');
    f.dst
        .push_str(&rounded.format("%Y-%m-%d %H:%M:%S").to_string());
    write_fraction(rounded.nanosecond(), precision, f.dst);
    f.dst.push('\'');
}

fn write_time(v: NaiveTime, precision: u32, dst: &mut String) {
    dst.push_str(&v.format("%H:%M:%S").to_string());
    // Times reuse the timestamp precision, truncating rather than rounding
    // so the hour never carries.
    if precision > 0 {
        let scale = 10u32.pow(9 - precision);
        write_fraction(v.nanosecond() / scale * scale, precision, dst);
    }
}

fn write_fraction(nanos: u32, precision: u32, dst: &mut String) {
    use std::fmt::Write;

    if precision == 0 {
        return;
    }
    let digits = nanos / 10u32.pow(9 - precision);
    write!(dst, ".{digits:0width$}", width = precision as usize).unwrap();
}

/// Rounds the fractional seconds half-up to the given number of digits,
/// carrying into the seconds on overflow.
fn round_to_precision(v: NaiveDateTime, precision: u32) -> NaiveDateTime {
    if precision >= 9 {
        return v;
    }

    let scale = 10u64.pow(9 - precision);
    let nanos = u64::from(v.nanosecond());
    let rounded = (nanos + scale / 2) / scale * scale;

    let base = v.with_nanosecond(0).expect("zero nanoseconds is valid");
    if rounded >= 1_000_000_000 {
        base + Duration::seconds(1)
    } else {
        base + Duration::nanoseconds(rounded as i64)
    }
}
