//! Temporal value types with canonical textual forms.
//!
//! # Responsibility
//! - Define `Time` (wall-clock UTC timestamp) and `Duration` (signed span).
//! - Own the single canonical textual layout used on the wire and in storage.
//!
//! # Invariants
//! - `Time` has second precision; `Time::parse` only accepts canonical layout,
//!   so `parse(format(x)) == x` and `format(parse(s)) == s`.
//! - `Duration` formats as `[-]XhYmZ.fffs` with sub-second units below one
//!   second; canonical strings round-trip exactly.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Canonical timestamp layout (`strftime` syntax), e.g. `2030-01-02 15:04:05`.
pub const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MINUTE;

// One component: optional integer digits, optional fraction, then a unit.
static DURATION_COMPONENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]*)(?:\.([0-9]*))?([^0-9.]+)").expect("valid duration component regex")
});

/// Wall-clock timestamp in UTC with second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(DateTime<Utc>);

impl Time {
    /// Current time truncated to whole seconds.
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(0))
    }

    /// Parses a timestamp that must be exactly in [`TIME_LAYOUT`].
    pub fn parse(value: &str) -> Result<Self, TimeParseError> {
        let naive = NaiveDateTime::parse_from_str(value, TIME_LAYOUT)
            .map_err(|err| TimeParseError::Layout(value.to_string(), err.to_string()))?;
        let parsed = Self(naive.and_utc());
        // chrono tolerates unpadded fields; only the canonical spelling is accepted.
        if parsed.to_string() != value {
            return Err(TimeParseError::NotCanonical(value.to_string()));
        }
        Ok(parsed)
    }

    pub fn is_after(&self, other: &Time) -> bool {
        self.0 > other.0
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(TIME_LAYOUT))
    }
}

impl FromStr for Time {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(de::Error::custom)
    }
}

/// Timestamp parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    /// Input does not match the layout at all.
    Layout(String, String),
    /// Input parsed but is not spelled in canonical form.
    NotCanonical(String),
}

impl Display for TimeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Layout(value, reason) => write!(
                f,
                "invalid time `{value}`: expected layout YYYY-MM-DD HH:MM:SS ({reason})"
            ),
            Self::NotCanonical(value) => write!(
                f,
                "invalid time `{value}`: fields must be zero-padded as YYYY-MM-DD HH:MM:SS"
            ),
        }
    }
}

impl Error for TimeParseError {}

/// Signed time span with nanosecond precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);

    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self(secs * NANOS_PER_SECOND as i64)
    }

    pub const fn from_mins(mins: i64) -> Self {
        Self(mins * NANOS_PER_MINUTE as i64)
    }

    pub const fn from_hours(hours: i64) -> Self {
        Self(hours * NANOS_PER_HOUR as i64)
    }

    pub const fn as_nanos(&self) -> i64 {
        self.0
    }

    /// Parses a duration such as `1h30m`, `1.5h`, `90s` or `250ms`.
    ///
    /// Accepted units: `ns`, `us` (`µs`, `μs`), `ms`, `s`, `m`, `h`. A bare
    /// `0` is accepted; any other unitless number is rejected.
    pub fn parse(value: &str) -> Result<Self, DurationParseError> {
        let invalid = || DurationParseError::Invalid(value.to_string());

        let (negative, mut rest) = match value.as_bytes().first() {
            Some(b'-') => (true, &value[1..]),
            Some(b'+') => (false, &value[1..]),
            _ => (false, value),
        };
        if rest == "0" {
            return Ok(Self::ZERO);
        }
        if rest.is_empty() {
            return Err(invalid());
        }

        let mut total: u128 = 0;
        while !rest.is_empty() {
            let caps = DURATION_COMPONENT_RE.captures(rest).ok_or_else(invalid)?;
            let whole_text = caps.get(1).map_or("", |m| m.as_str());
            let frac_text = caps.get(2).map_or("", |m| m.as_str());
            let unit_text = caps.get(3).map_or("", |m| m.as_str());
            if whole_text.is_empty() && frac_text.is_empty() {
                return Err(invalid());
            }

            let unit = unit_nanos(unit_text)
                .ok_or_else(|| DurationParseError::UnknownUnit(unit_text.to_string()))?;
            let whole = if whole_text.is_empty() {
                0
            } else {
                whole_text
                    .parse::<u64>()
                    .map_err(|_| DurationParseError::Overflow(value.to_string()))?
            };

            total += u128::from(whole) * u128::from(unit);
            total += fraction_nanos(frac_text, unit);
            if total > u128::from(i64::MAX as u64) + u128::from(negative) {
                return Err(DurationParseError::Overflow(value.to_string()));
            }

            rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
        }

        let magnitude = total as i128;
        let signed = if negative { -magnitude } else { magnitude };
        Ok(Self(signed as i64))
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            return f.write_str("0s");
        }
        if self.0 < 0 {
            f.write_str("-")?;
        }
        let magnitude = self.0.unsigned_abs();

        if magnitude < NANOS_PER_SECOND {
            let (precision, unit) = if magnitude < NANOS_PER_MICRO {
                (0, "ns")
            } else if magnitude < NANOS_PER_MILLI {
                (3, "µs")
            } else {
                (6, "ms")
            };
            let (whole, fraction) = split_fraction(magnitude, precision);
            return write!(f, "{whole}{fraction}{unit}");
        }

        let (total_secs, fraction) = split_fraction(magnitude, 9);
        let secs = total_secs % 60;
        let total_mins = total_secs / 60;
        let mins = total_mins % 60;
        let hours = total_mins / 60;
        if hours > 0 {
            write!(f, "{hours}h{mins}m{secs}{fraction}s")
        } else if total_mins > 0 {
            write!(f, "{mins}m{secs}{fraction}s")
        } else {
            write!(f, "{secs}{fraction}s")
        }
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(de::Error::custom)
    }
}

/// Duration parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    Invalid(String),
    UnknownUnit(String),
    Overflow(String),
}

impl Display for DurationParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(value) => write!(f, "invalid duration `{value}`"),
            Self::UnknownUnit(unit) => write!(f, "unknown unit `{unit}` in duration"),
            Self::Overflow(value) => write!(f, "duration `{value}` is out of range"),
        }
    }
}

impl Error for DurationParseError {}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

/// Scales decimal fraction digits by `unit`, truncating below one nanosecond.
fn fraction_nanos(digits: &str, unit: u64) -> u128 {
    let mut numerator: u128 = 0;
    let mut scale: u128 = 1;
    // Digits past 1e-18 cannot move the result for units up to one hour.
    for digit in digits.bytes().take(18) {
        numerator = numerator * 10 + u128::from(digit - b'0');
        scale *= 10;
    }
    numerator * u128::from(unit) / scale
}

/// Splits `value` into `value / 10^precision` and a `.ddd` suffix with
/// trailing zeros removed (empty when the fraction is zero).
fn split_fraction(value: u64, precision: u32) -> (u64, String) {
    if precision == 0 {
        return (value, String::new());
    }
    let scale = 10u64.pow(precision);
    let fraction = value % scale;
    if fraction == 0 {
        return (value / scale, String::new());
    }
    let digits = format!("{fraction:0width$}", width = precision as usize);
    (value / scale, format!(".{}", digits.trim_end_matches('0')))
}
