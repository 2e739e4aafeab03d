//! Calendar-day keys and the normalizer that produces them.
//!
//! Bookings arrive with dates in several shapes: bare `YYYY-MM-DD` strings,
//! ISO 8601 timestamps with or without an offset, or already-parsed values.
//! [`DateNormalizer`] reduces all of them to a [`DayKey`] in the deployment's
//! local calendar so that day comparisons never depend on time-of-day.
//!
//! Offset-bearing timestamps (`...Z`, `...+05:30`) denote an instant and are
//! converted into the configured timezone before the day is taken. Bare dates
//! and naive timestamps are already local wall time and keep their date as is.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BookingError, Result};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"];

/// A calendar day with no time-of-day or offset attached.
///
/// Serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a key from year/month/day, or `None` if that day does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// The following calendar day. `None` only at the end of chrono's range.
    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// Signed number of calendar days from `self` to `other`.
    pub fn days_until(self, other: DayKey) -> i64 {
        (other.0 - self.0).num_days()
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = BookingError;

    /// Strict `YYYY-MM-DD` parse. Use [`DateNormalizer`] for anything looser.
    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| BookingError::InvalidDate(s.to_string()))
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Every calendar day from `start` to `end`, both inclusive.
///
/// Steps by calendar day rather than by a fixed number of seconds, so DST
/// transitions never skip or repeat a day. Empty when `start > end`.
pub fn day_range(start: DayKey, end: DayKey) -> impl Iterator<Item = DayKey> {
    std::iter::successors(Some(start), |day| day.succ()).take_while(move |day| *day <= end)
}

/// Any value a booking date may arrive as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateLike<'a> {
    /// ISO 8601 text, with or without a time and offset.
    Text(&'a str),
    /// An absolute instant.
    Instant(DateTime<Utc>),
    /// A wall-clock timestamp already in local time.
    Local(NaiveDateTime),
    /// A bare calendar date.
    Day(NaiveDate),
}

impl<'a> From<&'a str> for DateLike<'a> {
    fn from(s: &'a str) -> Self {
        DateLike::Text(s)
    }
}

impl<'a> From<&'a String> for DateLike<'a> {
    fn from(s: &'a String) -> Self {
        DateLike::Text(s.as_str())
    }
}

impl From<DateTime<Utc>> for DateLike<'_> {
    fn from(dt: DateTime<Utc>) -> Self {
        DateLike::Instant(dt)
    }
}

impl From<DateTime<FixedOffset>> for DateLike<'_> {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        DateLike::Instant(dt.with_timezone(&Utc))
    }
}

impl From<NaiveDateTime> for DateLike<'_> {
    fn from(dt: NaiveDateTime) -> Self {
        DateLike::Local(dt)
    }
}

impl From<NaiveDate> for DateLike<'_> {
    fn from(d: NaiveDate) -> Self {
        DateLike::Day(d)
    }
}

impl From<DayKey> for DateLike<'_> {
    fn from(key: DayKey) -> Self {
        DateLike::Day(key.0)
    }
}

impl fmt::Display for DateLike<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateLike::Text(s) => f.write_str(s),
            DateLike::Instant(dt) => write!(f, "{}", dt.to_rfc3339()),
            DateLike::Local(dt) => write!(f, "{}", dt),
            DateLike::Day(d) => write!(f, "{}", d),
        }
    }
}

/// Reduces [`DateLike`] values to [`DayKey`]s in one deployment timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNormalizer {
    tz: Tz,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self { tz: Tz::UTC }
    }
}

impl DateNormalizer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Build a normalizer from an IANA timezone name (e.g. `"Africa/Lagos"`).
    ///
    /// # Errors
    /// Returns `BookingError::InvalidTimezone` if the name is not a known zone.
    pub fn from_timezone(name: &str) -> Result<Self> {
        let tz: Tz = name
            .trim()
            .parse()
            .map_err(|_| BookingError::InvalidTimezone(name.to_string()))?;
        Ok(Self { tz })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Normalize, reporting unparseable input as an error.
    ///
    /// # Errors
    /// Returns `BookingError::InvalidDate` when the text matches none of the
    /// accepted ISO 8601 shapes.
    pub fn try_normalize<'a>(&self, input: impl Into<DateLike<'a>>) -> Result<DayKey> {
        match input.into() {
            DateLike::Day(d) => Ok(DayKey(d)),
            DateLike::Local(dt) => Ok(DayKey(dt.date())),
            DateLike::Instant(dt) => Ok(self.local_day(dt)),
            DateLike::Text(s) => self.parse_text(s),
        }
    }

    /// Normalize, treating unparseable input as "no date".
    ///
    /// A `None` key never equals any day, so a booking carrying it never
    /// occupies anything. Each failure is logged at `warn`.
    pub fn normalize<'a>(&self, input: impl Into<DateLike<'a>>) -> Option<DayKey> {
        let input = input.into();
        match self.try_normalize(input) {
            Ok(key) => Some(key),
            Err(err) => {
                warn!(input = %input, error = %err, "date did not normalize; treating as unoccupied");
                None
            }
        }
    }

    fn local_day(&self, instant: DateTime<Utc>) -> DayKey {
        DayKey(instant.with_timezone(&self.tz).date_naive())
    }

    fn parse_text(&self, raw: &str) -> Result<DayKey> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(BookingError::InvalidDate(raw.to_string()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(self.local_day(dt.with_timezone(&Utc)));
        }
        for fmt in OFFSET_DATETIME_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Ok(self.local_day(dt.with_timezone(&Utc)));
            }
        }
        for fmt in NAIVE_DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(DayKey(dt.date()));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(DayKey)
            .map_err(|_| BookingError::InvalidDate(raw.to_string()))
    }
}
