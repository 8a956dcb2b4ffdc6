//! Calendar periods that expand into half-open [`TimeSpan`]s.

use crate::types::error::TimeSpanError;
use crate::types::time_span::TimeSpan;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Anything that covers a whole calendar period.
pub trait Period {
    /// The span from the first instant of the period up to the first instant of the next.
    fn span(self) -> Result<TimeSpan, TimeSpanError>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);

/// Year and half (1 or 2).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct HalfYear(pub i32, pub u32);

/// Year and quarter (1 to 4).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Quarter(pub i32, pub u32);

/// Year and month (1 to 12).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);

/// ISO year and ISO week. Weeks start on Monday.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct CalendarWeek(pub i32, pub u32);

impl Year {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl Month {
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

impl Display for CalendarWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.0, self.1)
    }
}

fn midnight(year: i32, month: u32, day: u32) -> Result<NaiveDateTime, TimeSpanError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|d| d.and_time(NaiveTime::MIN))
        .ok_or(TimeSpanError::Year(year))
}

/// Span of `months` calendar months starting at the first of `first_month`.
fn month_block(year: i32, first_month: u32, months: u32) -> Result<TimeSpan, TimeSpanError> {
    let start = midnight(year, first_month, 1)?;
    let next = first_month + months;
    let end = if next > 12 {
        midnight(year + 1, next - 12, 1)?
    } else {
        midnight(year, next, 1)?
    };
    Ok(TimeSpan::new(start, end))
}

impl Period for Year {
    fn span(self) -> Result<TimeSpan, TimeSpanError> {
        month_block(self.0, 1, 12)
    }
}

impl Period for HalfYear {
    fn span(self) -> Result<TimeSpan, TimeSpanError> {
        match self.1 {
            1 | 2 => month_block(self.0, (self.1 - 1) * 6 + 1, 6),
            half => Err(TimeSpanError::Half(half)),
        }
    }
}

impl Period for Quarter {
    fn span(self) -> Result<TimeSpan, TimeSpanError> {
        match self.1 {
            1..=4 => month_block(self.0, (self.1 - 1) * 3 + 1, 3),
            quarter => Err(TimeSpanError::Quarter(quarter)),
        }
    }
}

impl Period for Month {
    fn span(self) -> Result<TimeSpan, TimeSpanError> {
        match self.1 {
            1..=12 => month_block(self.0, self.1, 1),
            month => Err(TimeSpanError::Month(month)),
        }
    }
}

impl Period for CalendarWeek {
    fn span(self) -> Result<TimeSpan, TimeSpanError> {
        let monday = NaiveDate::from_isoywd_opt(self.0, self.1, Weekday::Mon).ok_or(
            TimeSpanError::Week {
                year: self.0,
                week: self.1,
            },
        )?;
        let start = monday.and_time(NaiveTime::MIN);
        Ok(TimeSpan::new(start, start + Duration::days(7)))
    }
}

impl Period for NaiveDate {
    fn span(self) -> Result<TimeSpan, TimeSpanError> {
        let start = self.and_time(NaiveTime::MIN);
        Ok(TimeSpan::new(start, start + Duration::days(1)))
    }
}

/// The `hours` hours leading up to `now`.
pub fn last_hours(now: NaiveDateTime, hours: u32) -> TimeSpan {
    TimeSpan::new(now - Duration::hours(i64::from(hours)), now)
}

/// The `days` days leading up to `now`.
pub fn last_days(now: NaiveDateTime, days: u32) -> TimeSpan {
    TimeSpan::new(now - Duration::days(i64::from(days)), now)
}
