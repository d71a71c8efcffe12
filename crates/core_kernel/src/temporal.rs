//! Calendar handling types
//!
//! This module provides the calendar vocabulary used by the simulators:
//! - Month: the twelve calendar months, named as the site presents them
//! - YearMonth: a month within a specific year, the granularity of payment periods
//! - Clock: an injectable source of "today", so evaluations are reproducible

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Timezone wrapper used to decide which calendar day "today" is
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timezone::from_name(&s).map_err(serde::de::Error::custom)
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parses an IANA timezone name such as `Europe/Madrid`
    pub fn from_name(name: &str) -> Result<Self, TemporalError> {
        Tz::from_str(name)
            .map(Timezone)
            .map_err(|_| TemporalError::UnknownTimezone(name.to_string()))
    }

    /// Returns the IANA name of the timezone
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Returns the local calendar date of a UTC instant
    pub fn local_date(&self, utc: DateTime<Utc>) -> NaiveDate {
        utc.with_timezone(&self.0).date_naive()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Europe::Madrid)
    }
}

/// Errors related to calendar values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Unknown month name: {0}")]
    UnknownMonth(String),

    #[error("Month ordinal out of range: {0}")]
    InvalidMonthOrdinal(u32),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// A calendar month
///
/// Names are the Spanish month names exactly as the simulator form offers
/// them; matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    Enero,
    Febrero,
    Marzo,
    Abril,
    Mayo,
    Junio,
    Julio,
    Agosto,
    Septiembre,
    Octubre,
    Noviembre,
    Diciembre,
}

impl Month {
    /// All months in calendar order
    pub const ALL: [Month; 12] = [
        Month::Enero,
        Month::Febrero,
        Month::Marzo,
        Month::Abril,
        Month::Mayo,
        Month::Junio,
        Month::Julio,
        Month::Agosto,
        Month::Septiembre,
        Month::Octubre,
        Month::Noviembre,
        Month::Diciembre,
    ];

    /// Zero-based position in the year (Enero = 0, Diciembre = 11)
    pub fn ordinal(&self) -> u32 {
        *self as u32
    }

    /// Returns the month at a zero-based position
    pub fn from_ordinal(ordinal: u32) -> Result<Self, TemporalError> {
        Self::ALL
            .get(ordinal as usize)
            .copied()
            .ok_or(TemporalError::InvalidMonthOrdinal(ordinal))
    }

    /// Looks up a month by its display name
    ///
    /// Returns `None` for anything that is not one of the twelve names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// Returns the display name
    pub fn name(&self) -> &'static str {
        match self {
            Month::Enero => "Enero",
            Month::Febrero => "Febrero",
            Month::Marzo => "Marzo",
            Month::Abril => "Abril",
            Month::Mayo => "Mayo",
            Month::Junio => "Junio",
            Month::Julio => "Julio",
            Month::Agosto => "Agosto",
            Month::Septiembre => "Septiembre",
            Month::Octubre => "Octubre",
            Month::Noviembre => "Noviembre",
            Month::Diciembre => "Diciembre",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::from_name(s).ok_or_else(|| TemporalError::UnknownMonth(s.to_string()))
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A month of a specific year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: Month,
}

impl YearMonth {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Returns the month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        // chrono months are 1-based and always within 1..=12
        let month = Month::ALL[date.month0() as usize];
        Self { year: date.year(), month }
    }

    /// Signed number of months from `self` to `later`
    ///
    /// Negative when `later` is actually earlier.
    pub fn months_until(&self, later: YearMonth) -> i64 {
        let years = i64::from(later.year) - i64::from(self.year);
        years * 12 + i64::from(later.month.ordinal()) - i64::from(self.month.ordinal())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

/// Source of the current date
pub trait Clock: Send + Sync {
    /// Returns today's calendar date
    fn today(&self) -> NaiveDate;

    /// Returns the month containing today
    fn current_month(&self) -> YearMonth {
        YearMonth::from_date(self.today())
    }
}

/// Wall-clock time, read in a configured timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    timezone: Timezone,
}

impl SystemClock {
    pub fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Timezone {
        self.timezone
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        self.timezone.local_date(Utc::now())
    }
}

/// A clock pinned to a single date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// A clock pinned to the first day of the given month
    pub fn at_month(year_month: YearMonth) -> Option<Self> {
        NaiveDate::from_ymd_opt(year_month.year, year_month.month.ordinal() + 1, 1).map(Self)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
