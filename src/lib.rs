//! ISO 8601 week dates (`%G-W%V`) computed from a local calendar breakdown.
//!
//! ```
//! use iso_week::{iso_week, CalendarDate};
//!
//! // 2024-12-31 is a Tuesday, the 366th day of a leap year
//! let date = CalendarDate::new(2024, 366, 2).unwrap();
//! assert_eq!(iso_week(date).to_string(), "2025-W01");
//! ```
//!
//! The calculator in [`week`] is pure and never touches a clock or a time zone. Turning a
//! timestamp into a [`CalendarDate`] is the job of [`calendar`], and [`report`] cross-checks the
//! whole chain against chrono.

pub mod calendar;
pub mod error;
pub mod report;
pub mod week;

pub use calendar::{iso_week_at, iso_week_now, week_date_at, week_date_now, Week, Zone};
pub use error::WeekError;
pub use report::{verify, Report, VerifyRange};
pub use week::{iso_week, normalize, weeks_in_iso_year, CalendarDate, IsoWeekDate, Output, WeekOutput};
