use thiserror::Error;

/// Errors raised while building a [`crate::TimeSpan`] from text, compact integers or
/// calendar periods.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeSpanError {
    #[error("Start '{start}' and end '{end}' are not in the same format")]
    InconsistentFormat { start: String, end: String },

    #[error("Missing separator between date and time in '{0}' (use 'T', a space or '{1}')")]
    MissingSeparator(String, char),

    #[error("Unsupported {part} width of {digits} digits in '{input}'")]
    UnsupportedWidth {
        input: String,
        part: &'static str,
        digits: usize,
    },

    #[error("Month {0} is invalid, choose between 1 and 12")]
    Month(u32),

    #[error("Day {day} is invalid for {year:04}-{month:02}")]
    Day { year: i32, month: u32, day: u32 },

    #[error("Hour {0} is invalid, choose between 0 and 23")]
    Hour(u32),

    #[error("Minute {0} is invalid, choose between 0 and 59")]
    Minute(u32),

    #[error("Second {0} is invalid, choose between 0 and 59")]
    Second(u32),

    #[error("Half {0} of the year is invalid, choose 1 or 2")]
    Half(u32),

    #[error("Quarter {0} is invalid, choose between 1 and 4")]
    Quarter(u32),

    #[error("Week {week} does not exist in {year:04}")]
    Week { year: i32, week: u32 },

    #[error("Year {0} is out of the supported calendar range")]
    Year(i32),
}

impl TimeSpanError {
    /// `true` for malformed or inconsistent input text.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            TimeSpanError::InconsistentFormat { .. }
                | TimeSpanError::MissingSeparator(..)
                | TimeSpanError::UnsupportedWidth { .. }
        )
    }

    /// `true` for calendar-invalid values (month 13, 31st of April, week 54, ...).
    pub fn is_range_error(&self) -> bool {
        !self.is_format_error()
    }
}
