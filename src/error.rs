use thiserror::Error;

/// Everything that can go wrong around a week computation.
///
/// The calculator itself only ever reports [`WeekError::InvalidInput`], and only through the
/// checked constructors. The remaining variants come from the input and output boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeekError {
    #[error("invalid {field}: {value}")]
    InvalidInput { field: &'static str, value: i64 },

    #[error("could not parse week date: {0}")]
    Parse(String),

    #[error("timestamp {0} is outside the representable calendar range")]
    TimestampOutOfRange(i64),

    #[error("year {0} is outside the representable calendar range")]
    YearOutOfRange(i32),

    #[error("unknown zone `{0}` (expected `local`, `utc` or an offset like `+02:00`)")]
    UnknownZone(String),
}
