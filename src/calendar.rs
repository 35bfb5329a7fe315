use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, TimeZone, Utc};
use log::trace;
use serde::Deserialize;

use crate::error::WeekError;
use crate::week::{iso_week, CalendarDate, IsoWeekDate, Output, WeekOutput};

/// Trait to abstract over the date-related types that can be placed in an ISO week
pub trait Week {
    /// the local calendar breakdown of this value
    fn calendar_date(&self) -> CalendarDate;

    fn week_date(&self) -> IsoWeekDate {
        iso_week(self.calendar_date())
    }

    /// converts this value to a string of the format `YYYY-Www` (e.g. 2023-W05)
    fn to_week(&self) -> String {
        self.week_date().to_string()
    }
}

impl Week for NaiveDate {
    fn calendar_date(&self) -> CalendarDate {
        // chrono guarantees both ranges
        CalendarDate::new_unchecked(self.year(), self.ordinal(), self.weekday().number_from_monday())
    }
}

impl<Tz: TimeZone> Week for DateTime<Tz> {
    fn calendar_date(&self) -> CalendarDate {
        self.date_naive().calendar_date()
    }
}

/// The locality rule used to break a timestamp down into a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Zone {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl FromStr for Zone {
    type Err = WeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Zone::Local),
            "utc" | "z" => Ok(Zone::Utc),
            other => parse_offset(other)
                .map(Zone::Fixed)
                .ok_or_else(|| WeekError::UnknownZone(s.to_string())),
        }
    }
}

impl TryFrom<String> for Zone {
    type Error = WeekError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Local => f.write_str("local"),
            Zone::Utc => f.write_str("utc"),
            Zone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

// Accepts `+HH`, `+HHMM` and `+HH:MM` (and the `-` forms).
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let sign = match s.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits: String = s[1..].chars().filter(|c| *c != ':').collect();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// The calendar date `timestamp` (seconds since the unix epoch) falls on in `zone`.
pub fn local_date_at(timestamp: i64, zone: Zone) -> Result<NaiveDate, WeekError> {
    let date = match zone {
        Zone::Local => Local.timestamp_opt(timestamp, 0).single().map(|dt| dt.date_naive()),
        Zone::Utc => Utc.timestamp_opt(timestamp, 0).single().map(|dt| dt.date_naive()),
        Zone::Fixed(offset) => offset.timestamp_opt(timestamp, 0).single().map(|dt| dt.date_naive()),
    };
    date.ok_or(WeekError::TimestampOutOfRange(timestamp))
}

pub fn calendar_date_at(timestamp: i64, zone: Zone) -> Result<CalendarDate, WeekError> {
    let date = local_date_at(timestamp, zone)?;
    trace!("timestamp {} in zone {} is {}", timestamp, zone, date);
    Ok(date.calendar_date())
}

pub fn week_date_at(timestamp: i64, zone: Zone) -> Result<IsoWeekDate, WeekError> {
    calendar_date_at(timestamp, zone).map(iso_week)
}

/// The ISO week of `timestamp` in `zone`, either as `"2024-W01"` or as `(2024, 1)`.
pub fn iso_week_at(timestamp: i64, zone: Zone, output: Output) -> Result<WeekOutput, WeekError> {
    week_date_at(timestamp, zone).map(|week| week.render(output))
}

/// Like [`week_date_at`] for the current instant, read from the clock on every call.
pub fn week_date_now(zone: Zone) -> Result<IsoWeekDate, WeekError> {
    week_date_at(Utc::now().timestamp(), zone)
}

pub fn iso_week_now(zone: Zone, output: Output) -> Result<WeekOutput, WeekError> {
    week_date_now(zone).map(|week| week.render(output))
}
