//! Date arithmetic expressed through each dialect's own idiom.
//!
//! PostgreSQL adds a cast interval, MySQL nests `DATE_ADD` calls, and
//! SQLite passes modifier strings to `datetime()`.

use crate::Flavor;

use quill_core::stmt::Expr;

/// A calendar interval, unit by unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateInterval {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl DateInterval {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn years(mut self, years: i64) -> Self {
        self.years = years;
        self
    }

    pub fn months(mut self, months: i64) -> Self {
        self.months = months;
        self
    }

    pub fn days(mut self, days: i64) -> Self {
        self.days = days;
        self
    }

    pub fn hours(mut self, hours: i64) -> Self {
        self.hours = hours;
        self
    }

    pub fn minutes(mut self, minutes: i64) -> Self {
        self.minutes = minutes;
        self
    }

    pub fn seconds(mut self, seconds: i64) -> Self {
        self.seconds = seconds;
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn negated(&self) -> Self {
        Self {
            years: -self.years,
            months: -self.months,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
        }
    }

    /// Non-zero units in calendar order, largest first.
    fn units(&self) -> Vec<(&'static str, i64)> {
        [
            ("years", self.years),
            ("months", self.months),
            ("days", self.days),
            ("hours", self.hours),
            ("minutes", self.minutes),
            ("seconds", self.seconds),
        ]
        .into_iter()
        .filter(|(_, value)| *value != 0)
        .collect()
    }
}

/// Builds an expression adding `interval` to a date/timestamp expression.
pub fn date_add(flavor: Flavor, expr: impl Into<Expr>, interval: &DateInterval) -> Expr {
    let expr = expr.into();

    match flavor {
        Flavor::Postgresql => {
            // (CAST(a AS timestamp) + CAST('1 days ' AS interval))
            let mut spec = String::new();
            for (unit, value) in interval.units() {
                spec.push_str(&format!("{value} {unit} "));
            }
            Expr::add(
                Expr::cast(expr, "timestamp"),
                Expr::cast(spec, "interval"),
            )
        }
        Flavor::Mysql => {
            // DATE_ADD(DATE_ADD(a, INTERVAL 1 DAY), INTERVAL 2 HOUR)
            let mut ret = expr;
            for (unit, value) in interval.units() {
                let unit = unit[..unit.len() - 1].to_uppercase();
                ret = Expr::func(
                    "DATE_ADD",
                    vec![ret, Expr::raw(format!("INTERVAL {value} {unit}"))],
                );
            }
            ret
        }
        Flavor::Sqlite => {
            // datetime(a, '+1 days', '+2 hours')
            let mut args = vec![expr];
            for (unit, value) in interval.units() {
                args.push(Expr::from(format!("{value:+} {unit}")));
            }
            Expr::func("datetime", args)
        }
    }
}

/// Builds an expression subtracting `interval` from a date/timestamp
/// expression.
pub fn date_sub(flavor: Flavor, expr: impl Into<Expr>, interval: &DateInterval) -> Expr {
    date_add(flavor, expr, &interval.negated())
}
