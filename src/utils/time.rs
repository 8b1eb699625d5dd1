//! Time utilities: the canonical decimal-seconds wire format and the
//! text format used for the `time` column in SQLite.
//!
//! Wire timestamps are seconds since the Unix epoch with exactly four
//! fractional digits (`"1650000000.1234"`). All conversions go through
//! integer ticks of 1e-4 s so that encoding never depends on float rounding.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fractional digits of the canonical wire format.
pub const PRECISION: usize = 4;

/// Ticks (1e-4 s) per second.
pub const TICKS_PER_SECOND: i64 = 10_000;

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_TICK: i64 = NANOS_PER_SECOND / TICKS_PER_SECOND;

/// Text layout of the `time` column: UTC, nine fractional digits.
/// Fixed width keeps lexicographic order equal to chronological order.
const ENGINE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f%:z";
const ENGINE_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// Years the `time` column can hold while staying four digits wide.
const COLUMN_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Instant rounded (half-up) to the wire precision, in 1e-4 s units.
pub fn ticks(instant: &DateTime<Utc>) -> i64 {
    let secs = instant.timestamp();
    let nanos = i64::from(instant.timestamp_subsec_nanos());
    secs * TICKS_PER_SECOND + (nanos + NANOS_PER_TICK / 2) / NANOS_PER_TICK
}

/// Render ticks as `"<secs>.<4 digits>"`.
pub fn format_ticks(ticks: i64) -> String {
    let sign = if ticks < 0 { "-" } else { "" };
    let abs = ticks.unsigned_abs();
    let per_second = TICKS_PER_SECOND.unsigned_abs();
    format!(
        "{sign}{}.{:0width$}",
        abs / per_second,
        abs % per_second,
        width = PRECISION
    )
}

/// Canonical wire representation of an instant.
pub fn encode(instant: &DateTime<Utc>) -> String {
    format_ticks(ticks(instant))
}

/// Parse decimal seconds since epoch.
///
/// Plain decimals are parsed exactly (up to nanoseconds); exponent
/// notation falls back to `f64`. Instants outside years 0000-9999 are
/// rejected: the `time` column cannot order them.
pub fn decode(value: &str) -> AppResult<DateTime<Utc>> {
    let malformed = || AppError::MalformedTimestamp(value.to_string());
    decode_unchecked(value)
        .filter(|instant| COLUMN_YEARS.contains(&instant.year()))
        .ok_or_else(malformed)
}

fn decode_unchecked(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));

    let is_plain = !(whole.is_empty() && frac.is_empty())
        && whole.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit());
    if !is_plain {
        return decode_float(trimmed);
    }

    let secs: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let frac = frac.as_bytes();
    let nanos = (0..9).fold(0i64, |acc, i| {
        acc * 10 + frac.get(i).map_or(0, |d| i64::from(d - b'0'))
    });

    let (secs, nanos) = match (negative, nanos) {
        (false, _) => (secs, nanos),
        (true, 0) => (-secs, 0),
        (true, n) => (-secs - 1, NANOS_PER_SECOND - n),
    };

    DateTime::from_timestamp(secs, nanos as u32)
}

fn decode_float(value: &str) -> Option<DateTime<Utc>> {
    let f: f64 = value.parse().ok()?;
    if !f.is_finite() {
        return None;
    }
    let secs = f.floor();
    let mut nanos = ((f - secs) * 1e9).round() as i64;
    let mut secs = secs as i64;
    if nanos >= NANOS_PER_SECOND {
        secs += 1;
        nanos -= NANOS_PER_SECOND;
    }
    DateTime::from_timestamp(secs, nanos as u32)
}

/// Text written to the `time` column.
pub fn format_engine(instant: &DateTime<Utc>) -> String {
    instant.format(ENGINE_FORMAT).to_string()
}

/// Parse the `time` column back into an instant.
pub fn parse_engine(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_str(value, ENGINE_PARSE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::MalformedTimestamp(value.to_string()))
}

/// Point in time a command ran. Serialized as the canonical wire string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn ticks(&self) -> i64 {
        ticks(&self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(&self.0))
    }
}

impl FromStr for Timestamp {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(Self)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
