//! Tagged input accepted wherever a span endpoint is expected.

use crate::types::error::TimeSpanError;
use crate::types::time_span::{normalize_separator, parse_instant, TimeSpan};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// One endpoint of a [`TimeSpan`], in any of the forms callers tend to have at hand.
///
/// # Examples
///
/// ```
/// use dwd_opendata::{TimePoint, TimeSpan};
/// use chrono::NaiveDate;
///
/// let start = TimePoint::Compact(2019010106);
/// let end = TimePoint::Date(NaiveDate::from_ymd_opt(2019, 1, 2).unwrap());
/// let span = TimeSpan::from_points(start, end, 'T').unwrap();
/// assert_eq!(span.to_string(), "2019-01-01T06:00:00,2019-01-02T00:00:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimePoint {
    /// Loosely formatted text, see [`TimeSpan::parse`].
    Text(String),
    /// `YYYYMMDD` or `YYYYMMDDHH[MM[SS]]` written as a number.
    Compact(u64),
    DateTime(NaiveDateTime),
    /// Midnight at the start of the day.
    Date(NaiveDate),
}

impl TimePoint {
    pub fn resolve(&self, separator: char) -> Result<NaiveDateTime, TimeSpanError> {
        match self {
            TimePoint::Text(text) => parse_instant(&normalize_separator(text, separator), separator),
            TimePoint::Compact(number) => {
                let digits = number.to_string();
                if digits.len() > 8 {
                    let (date, time) = digits.split_at(8);
                    parse_instant(&format!("{date}T{time}"), separator)
                } else {
                    parse_instant(&digits, separator)
                }
            }
            TimePoint::DateTime(instant) => Ok(*instant),
            TimePoint::Date(date) => Ok(date.and_time(NaiveTime::MIN)),
        }
    }
}

impl From<&str> for TimePoint {
    fn from(value: &str) -> Self {
        TimePoint::Text(value.to_string())
    }
}

impl From<String> for TimePoint {
    fn from(value: String) -> Self {
        TimePoint::Text(value)
    }
}

impl From<u64> for TimePoint {
    fn from(value: u64) -> Self {
        TimePoint::Compact(value)
    }
}

impl From<NaiveDateTime> for TimePoint {
    fn from(value: NaiveDateTime) -> Self {
        TimePoint::DateTime(value)
    }
}

impl From<NaiveDate> for TimePoint {
    fn from(value: NaiveDate) -> Self {
        TimePoint::Date(value)
    }
}

impl TimeSpan {
    /// Builds a span from two tagged endpoints.
    ///
    /// Two text endpoints go through [`TimeSpan::parse`] so their formats are checked
    /// against each other; any other combination resolves each endpoint on its own.
    pub fn from_points(
        start: impl Into<TimePoint>,
        end: impl Into<TimePoint>,
        separator: char,
    ) -> Result<Self, TimeSpanError> {
        match (start.into(), end.into()) {
            (TimePoint::Text(a), TimePoint::Text(b)) => TimeSpan::parse(&a, &b, separator),
            (a, b) => Ok(TimeSpan::new(a.resolve(separator)?, b.resolve(separator)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn compact_numbers_resolve_by_width() {
        assert_eq!(
            TimePoint::Compact(20190315).resolve('T').unwrap(),
            dt(2019, 3, 15, 0, 0)
        );
        assert_eq!(
            TimePoint::Compact(2019031512).resolve('T').unwrap(),
            dt(2019, 3, 15, 12, 0)
        );
        assert_eq!(
            TimePoint::Compact(201903151245).resolve('T').unwrap(),
            dt(2019, 3, 15, 12, 45)
        );
    }

    #[test]
    fn compact_numbers_with_odd_widths_fail() {
        let err = TimePoint::Compact(201903151).resolve('T').unwrap_err();
        assert!(err.is_format_error());
        let err = TimePoint::Compact(20191315).resolve('T').unwrap_err();
        assert_eq!(err, TimeSpanError::Month(13));
    }

    #[test]
    fn mixed_points_build_a_span() {
        let span = TimeSpan::from_points(
            dt(2019, 5, 1, 0, 0),
            NaiveDate::from_ymd_opt(2019, 4, 1).unwrap(),
            'T',
        )
        .unwrap();
        assert_eq!(span.start(), dt(2019, 4, 1, 0, 0));
        assert_eq!(span.end(), dt(2019, 5, 1, 0, 0));
    }

    #[test]
    fn text_points_keep_the_consistency_check() {
        let err = TimeSpan::from_points("2019-01-01", "2019-01-01T12", 'T').unwrap_err();
        assert!(matches!(err, TimeSpanError::InconsistentFormat { .. }));

        let span = TimeSpan::from_points("2019-01-01", 20190102u64, 'T').unwrap();
        assert_eq!(span.end(), dt(2019, 1, 2, 0, 0));
    }
}
