//! Cross-checks the week calculator against chrono's own `%G-W%V` formatting.

use std::fmt::{Display, Formatter};

use chrono::{Duration, FixedOffset, Local, NaiveDate, TimeZone, Utc};
use log::debug;
use serde::Deserialize;

use crate::calendar::{iso_week_at, local_date_at, Zone};
use crate::error::WeekError;
use crate::week::Output;

const SECONDS_PER_DAY: i64 = 86_400;

/// Which instants to sample: every local midnight `-window..window` days around December 31
/// of each year in `from_year..to_year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VerifyRange {
    pub from_year: i32,
    pub to_year: i32,
    pub window: u32,
}

impl Default for VerifyRange {
    fn default() -> Self {
        VerifyRange {
            from_year: 1970,
            to_year: 2070,
            window: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub rows: Vec<Row>,
    pub successes: usize,
}

/// One disagreement between chrono and the calculator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub date: NaiveDate,
    pub reference: String,
    pub ours: String,
}

impl Report {
    pub fn failures(&self) -> usize {
        self.rows.len()
    }

    pub fn passed(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            writeln!(f, "ERROR for following date: {};", row.date)?;
            writeln!(f, "  system says {}, our code says {}", row.reference, row.ours)?;
        }
        write!(
            f,
            "Testing found {} successes, {} failures.",
            self.successes,
            self.failures()
        )
    }
}

fn midnight_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<i64> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    // midnight can fall into a DST gap; the first instant after it is then good enough
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|dt| dt.timestamp())
}

fn midnight(date: NaiveDate, zone: Zone) -> Option<i64> {
    match zone {
        Zone::Local => midnight_in(&Local, date),
        Zone::Utc => midnight_in(&Utc, date),
        Zone::Fixed(offset) => midnight_in::<FixedOffset>(&offset, date),
    }
}

pub fn verify(range: VerifyRange, zone: Zone) -> Result<Report, WeekError> {
    debug!(
        "verifying years {}..{} with a window of {} days in zone {}",
        range.from_year, range.to_year, range.window, zone
    );
    let window = i64::from(range.window);
    let mut report = Report {
        rows: vec![],
        successes: 0,
    };

    for year in range.from_year..range.to_year {
        let end_of_year = NaiveDate::from_ymd_opt(year, 12, 31)
            .and_then(|date| midnight(date, zone))
            .ok_or(WeekError::YearOutOfRange(year))?;

        for offset in -window..window {
            let timestamp = end_of_year + offset * SECONDS_PER_DAY;
            let date = local_date_at(timestamp, zone)?;
            let reference = date.format("%G-W%V").to_string();
            let ours = iso_week_at(timestamp, zone, Output::String)?.to_string();
            if reference == ours {
                report.successes += 1;
            } else {
                debug!("mismatch on {}: chrono {}, calculator {}", date, reference, ours);
                report.rows.push(Row {
                    date,
                    reference,
                    ours,
                });
            }
        }
    }

    debug!(
        "verification done: {} successes, {} failures",
        report.successes,
        report.failures()
    );
    Ok(report)
}
