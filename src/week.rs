//! The week calculator: maps a local calendar breakdown onto its ISO 8601 week-year and week.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WeekError;

/// The local calendar breakdown of a point in time.
///
/// `day_of_year` is 1-based (1..=366) and `day_of_week` follows the ISO convention
/// (1 = Monday .. 7 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarDate {
    year: i32,
    day_of_year: u32,
    day_of_week: u32,
}

impl CalendarDate {
    pub fn new(year: i32, day_of_year: u32, day_of_week: u32) -> Result<CalendarDate, WeekError> {
        // the week can spill into the neighbouring year, which must exist too
        if year == i32::MIN || year == i32::MAX {
            return Err(WeekError::YearOutOfRange(year));
        }
        if !(1..=366).contains(&day_of_year) {
            return Err(WeekError::InvalidInput {
                field: "day_of_year",
                value: i64::from(day_of_year),
            });
        }
        if !(1..=7).contains(&day_of_week) {
            return Err(WeekError::InvalidInput {
                field: "day_of_week",
                value: i64::from(day_of_week),
            });
        }
        Ok(CalendarDate::new_unchecked(year, day_of_year, day_of_week))
    }

    /// Builds a date without any sanity check.
    ///
    /// Callers guarantee `day_of_year` in 1..=366, `day_of_week` in 1..=7 and a year strictly
    /// between `i32::MIN` and `i32::MAX`; anything else yields a meaningless week or overflows.
    pub fn new_unchecked(year: i32, day_of_year: u32, day_of_week: u32) -> CalendarDate {
        debug_assert!(year > i32::MIN && year < i32::MAX);
        debug_assert!((1..=366).contains(&day_of_year));
        debug_assert!((1..=7).contains(&day_of_week));
        CalendarDate {
            year,
            day_of_year,
            day_of_week,
        }
    }

    /// From a C `struct tm` style breakdown: `tm_yday` counts from 0, `tm_wday` has 0 = Sunday.
    pub fn from_sunday_based(year: i32, yday0: u32, wday0: u32) -> Result<CalendarDate, WeekError> {
        if wday0 > 6 {
            return Err(WeekError::InvalidInput {
                field: "day_of_week",
                value: i64::from(wday0),
            });
        }
        let day_of_week = if wday0 == 0 { 7 } else { wday0 };
        CalendarDate::new(year, yday0.saturating_add(1), day_of_week)
    }

    /// From a breakdown with a 1-based day of year and a 0 = Monday weekday.
    pub fn from_monday_based(year: i32, day_of_year: u32, wday0: u32) -> Result<CalendarDate, WeekError> {
        CalendarDate::new(year, day_of_year, wday0.saturating_add(1))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn day_of_year(&self) -> u32 {
        self.day_of_year
    }

    pub fn day_of_week(&self) -> u32 {
        self.day_of_week
    }
}

/// An ISO 8601 week-year and week number. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWeekDate")]
pub struct IsoWeekDate {
    pub week_year: i32,
    pub week_number: u32,
}

#[derive(Deserialize)]
struct RawWeekDate {
    week_year: i32,
    week_number: u32,
}

impl TryFrom<RawWeekDate> for IsoWeekDate {
    type Error = WeekError;

    fn try_from(raw: RawWeekDate) -> Result<Self, Self::Error> {
        IsoWeekDate::new(raw.week_year, raw.week_number)
    }
}

/// Shape of the value handed back to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output {
    /// `"2024-W01"`
    #[default]
    String,
    /// `(2024, 1)`
    Tuple,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeekOutput {
    Text(String),
    Pair(i32, u32),
}

impl IsoWeekDate {
    /// Checks `week_number` against the weeks `week_year` actually has.
    pub fn new(week_year: i32, week_number: u32) -> Result<IsoWeekDate, WeekError> {
        if week_number < 1 || week_number > weeks_in_iso_year(week_year) {
            return Err(WeekError::InvalidInput {
                field: "week_number",
                value: i64::from(week_number),
            });
        }
        Ok(IsoWeekDate {
            week_year,
            week_number,
        })
    }

    pub fn render(&self, output: Output) -> WeekOutput {
        match output {
            Output::String => WeekOutput::Text(self.to_string()),
            Output::Tuple => WeekOutput::Pair(self.week_year, self.week_number),
        }
    }
}

impl Display for IsoWeekDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-W{:02}", self.week_year, self.week_number)
    }
}

impl Display for WeekOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WeekOutput::Text(text) => f.write_str(text),
            WeekOutput::Pair(year, week) => write!(f, "({}, {})", year, week),
        }
    }
}

impl FromStr for IsoWeekDate {
    type Err = WeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || WeekError::Parse(s.to_string());
        let (year, week) = s.rsplit_once("-W").ok_or_else(malformed)?;
        if week.len() != 2 || !week.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        // only the canonical year spelling: no sign but `-`, no leading zeros, no `-0`
        let digits = year.strip_prefix('-').unwrap_or(year);
        if digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || (digits.len() > 1 && digits.starts_with('0'))
            || year == "-0"
        {
            return Err(malformed());
        }
        let week_year: i32 = year.parse().map_err(|_| malformed())?;
        let week_number: u32 = week.parse().map_err(|_| malformed())?;
        IsoWeekDate::new(week_year, week_number).map_err(|_| malformed())
    }
}

// Weekday of December 31 of `year`, 0 = Sunday. Floor division keeps it valid before year 1.
fn dec31_weekday(year: i64) -> i64 {
    (year + year.div_euclid(4) - year.div_euclid(100) + year.div_euclid(400)).rem_euclid(7)
}

/// Number of ISO weeks in `year`: 53 when it ends on a Thursday or the year before ended on a
/// Wednesday, 52 otherwise.
pub fn weeks_in_iso_year(year: i32) -> u32 {
    let year = i64::from(year);
    if dec31_weekday(year) == 4 || dec31_weekday(year - 1) == 3 {
        53
    } else {
        52
    }
}

/// Folds a candidate week that under- or overflows `year` into the neighbouring week-year.
///
/// `year` must lie strictly between `i32::MIN` and `i32::MAX`, as [`CalendarDate::new`] ensures.
pub fn normalize(year: i32, week: i32) -> IsoWeekDate {
    if week < 1 {
        IsoWeekDate {
            week_year: year - 1,
            week_number: weeks_in_iso_year(year - 1),
        }
    } else if week as u32 > weeks_in_iso_year(year) {
        IsoWeekDate {
            week_year: year + 1,
            week_number: 1,
        }
    } else {
        IsoWeekDate {
            week_year: year,
            week_number: week as u32,
        }
    }
}

pub fn iso_week(date: CalendarDate) -> IsoWeekDate {
    // 10 + doy - dow is at least 4, so truncating division is floor here.
    let candidate = (10 + date.day_of_year as i32 - date.day_of_week as i32) / 7;
    normalize(date.year, candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, day_of_year: u32, day_of_week: u32) -> CalendarDate {
        CalendarDate::new(year, day_of_year, day_of_week).unwrap()
    }

    #[test]
    fn known_long_years() {
        for year in [2004, 2009, 2015, 2020, 2026, 2032] {
            assert_eq!(weeks_in_iso_year(year), 53, "{year} should have 53 weeks");
        }
    }

    #[test]
    fn known_short_years() {
        for year in [2019, 2021, 2022, 2023, 2024, 2025] {
            assert_eq!(weeks_in_iso_year(year), 52, "{year} should have 52 weeks");
        }
    }

    #[test]
    fn dec31_weekday_uses_sunday_zero() {
        // 2020-12-31 was a Thursday, 2023-12-31 a Sunday
        assert_eq!(dec31_weekday(2020), 4);
        assert_eq!(dec31_weekday(2023), 0);
        // proleptic: 0000-12-31 was a Sunday, -0001-12-31 a Friday
        assert_eq!(dec31_weekday(0), 0);
        assert_eq!(dec31_weekday(-1), 5);
    }

    #[test]
    fn normalize_underflow_goes_to_last_week_of_previous_year() {
        assert_eq!(
            normalize(2021, 0),
            IsoWeekDate {
                week_year: 2020,
                week_number: 53
            }
        );
        assert_eq!(
            normalize(2023, 0),
            IsoWeekDate {
                week_year: 2022,
                week_number: 52
            }
        );
    }

    #[test]
    fn normalize_overflow_goes_to_first_week_of_next_year() {
        assert_eq!(
            normalize(2024, 53),
            IsoWeekDate {
                week_year: 2025,
                week_number: 1
            }
        );
        // 2020 really has a week 53
        assert_eq!(
            normalize(2020, 53),
            IsoWeekDate {
                week_year: 2020,
                week_number: 53
            }
        );
    }

    #[test]
    fn normalize_in_range_is_identity() {
        assert_eq!(
            normalize(2024, 17),
            IsoWeekDate {
                week_year: 2024,
                week_number: 17
            }
        );
    }

    #[test]
    fn concrete_dates() {
        // 2024-01-01, a Monday
        assert_eq!(iso_week(date(2024, 1, 1)).to_string(), "2024-W01");
        // 2024-12-31, a Tuesday
        assert_eq!(iso_week(date(2024, 366, 2)).to_string(), "2025-W01");
        // 2021-01-01, a Friday
        assert_eq!(iso_week(date(2021, 1, 5)).to_string(), "2020-W53");
        // 2027-01-03, a Sunday
        assert_eq!(iso_week(date(2027, 3, 7)).to_string(), "2026-W53");
    }

    #[test]
    fn checked_constructor_rejects_out_of_range() {
        assert_eq!(
            CalendarDate::new(2024, 0, 1),
            Err(WeekError::InvalidInput {
                field: "day_of_year",
                value: 0
            })
        );
        assert_eq!(
            CalendarDate::new(2024, 367, 1),
            Err(WeekError::InvalidInput {
                field: "day_of_year",
                value: 367
            })
        );
        assert_eq!(
            CalendarDate::new(2024, 10, 0),
            Err(WeekError::InvalidInput {
                field: "day_of_week",
                value: 0
            })
        );
        assert!(CalendarDate::new(2024, 10, 8).is_err());
    }

    #[test]
    fn checked_constructor_rejects_years_without_a_neighbour() {
        assert_eq!(
            CalendarDate::new(i32::MIN, 1, 7),
            Err(WeekError::YearOutOfRange(i32::MIN))
        );
        assert_eq!(
            CalendarDate::new(i32::MAX, 366, 1),
            Err(WeekError::YearOutOfRange(i32::MAX))
        );
    }

    #[test]
    fn extreme_representable_years_stay_defined() {
        // Jan 1 on a Sunday spills back into the previous year
        let low = iso_week(date(i32::MIN + 1, 1, 7));
        assert_eq!(low.week_year, i32::MIN);
        assert_eq!(low.week_number, weeks_in_iso_year(i32::MIN));
        // Dec 31 on a Monday spills forward into week 1
        let high = iso_week(date(i32::MAX - 1, 366, 1));
        assert_eq!(
            high,
            IsoWeekDate {
                week_year: i32::MAX,
                week_number: 1
            }
        );
    }

    #[test]
    fn accessors_return_the_breakdown() {
        let d = date(2021, 45, 7);
        assert_eq!(d.year(), 2021);
        assert_eq!(d.day_of_year(), 45);
        assert_eq!(d.day_of_week(), 7);
    }

    #[test]
    fn sunday_based_breakdown_maps_sunday_to_seven() {
        // tm_yday = 2, tm_wday = 0: 2027-01-03, a Sunday
        let d = CalendarDate::from_sunday_based(2027, 2, 0).unwrap();
        assert_eq!(d, date(2027, 3, 7));
        let d = CalendarDate::from_sunday_based(2024, 0, 1).unwrap();
        assert_eq!(d, date(2024, 1, 1));
        assert!(CalendarDate::from_sunday_based(2024, 0, 7).is_err());
    }

    #[test]
    fn monday_based_breakdown_shifts_by_one() {
        let d = CalendarDate::from_monday_based(2021, 1, 4).unwrap();
        assert_eq!(d, date(2021, 1, 5));
        assert!(CalendarDate::from_monday_based(2021, 1, 7).is_err());
    }

    #[test]
    fn display_pads_week_but_not_year() {
        let week = IsoWeekDate {
            week_year: 987,
            week_number: 3,
        };
        assert_eq!(week.to_string(), "987-W03");
        let week = IsoWeekDate {
            week_year: 2020,
            week_number: 53,
        };
        assert_eq!(week.to_string(), "2020-W53");
    }

    #[test]
    fn parse_accepts_rendered_form() {
        let week: IsoWeekDate = "2020-W53".parse().unwrap();
        assert_eq!(
            week,
            IsoWeekDate {
                week_year: 2020,
                week_number: 53
            }
        );
        let week: IsoWeekDate = "-44-W05".parse().unwrap();
        assert_eq!(week.week_year, -44);
        assert_eq!(week.week_number, 5);
    }

    #[test]
    fn parse_rejects_malformed() {
        for input in [
            "2024W01", "2024-W1", "2024-W001", "2024-Wx1", "abc-W01", "+2024-W01", "2021-W53", "2024-W00", "",
            "02024-W01", "-0-W01", "-02024-W01", "--5-W01", "-W01",
        ] {
            assert!(input.parse::<IsoWeekDate>().is_err(), "{input:?} should not parse");
        }
    }

    #[test]
    fn parse_accepts_year_zero() {
        let week: IsoWeekDate = "0-W10".parse().unwrap();
        assert_eq!(week.week_year, 0);
        assert_eq!(week.to_string(), "0-W10");
    }

    #[test]
    fn new_checks_week_range() {
        assert!(IsoWeekDate::new(2020, 53).is_ok());
        assert_eq!(
            IsoWeekDate::new(2021, 53),
            Err(WeekError::InvalidInput {
                field: "week_number",
                value: 53
            })
        );
        assert!(IsoWeekDate::new(2021, 0).is_err());
    }

    #[test]
    fn deserialize_enforces_week_range() {
        let week: IsoWeekDate = serde_json::from_str(r#"{"week_year":2020,"week_number":53}"#).unwrap();
        assert_eq!(week, IsoWeekDate::new(2020, 53).unwrap());
        for json in [
            r#"{"week_year":2021,"week_number":60}"#,
            r#"{"week_year":2021,"week_number":53}"#,
            r#"{"week_year":2021,"week_number":0}"#,
        ] {
            assert!(serde_json::from_str::<IsoWeekDate>(json).is_err(), "{json} should be rejected");
        }
    }

    #[test]
    fn serialize_is_a_plain_pair() {
        let json = serde_json::to_string(&IsoWeekDate::new(2025, 1).unwrap()).unwrap();
        assert_eq!(json, r#"{"week_year":2025,"week_number":1}"#);
    }

    #[test]
    fn render_selects_shape() {
        let week = iso_week(date(2024, 1, 1));
        assert_eq!(week.render(Output::String), WeekOutput::Text("2024-W01".to_string()));
        assert_eq!(week.render(Output::Tuple), WeekOutput::Pair(2024, 1));
        assert_eq!(week.render(Output::Tuple).to_string(), "(2024, 1)");
    }

    #[test]
    fn ordering_is_chronological() {
        let a: IsoWeekDate = "2020-W53".parse().unwrap();
        let b: IsoWeekDate = "2021-W01".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn same_input_same_output() {
        let d = date(2024, 366, 2);
        assert_eq!(iso_week(d), iso_week(d));
    }
}
