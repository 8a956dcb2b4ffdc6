//! The half-open time interval used for query windows and archive coverage, plus the
//! digit-count driven parser that turns loosely formatted date/time text into one.

use crate::types::error::TimeSpanError;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DAY_FIRST_MARKER: &str = "de";

/// An immutable interval `[start, end)` of two UTC wall-clock timestamps.
///
/// Construction always yields `start <= end`: bounds given in the wrong order are swapped.
/// Every operation returns a new value.
///
/// # Comparisons
///
/// `TimeSpan` deliberately has no `PartialOrd` implementation. The ordering helpers are
/// asymmetric: [`TimeSpan::lt_both`] and [`TimeSpan::gt_both`] require *both* bounds to
/// compare strictly, while [`TimeSpan::le_either`] and [`TimeSpan::ge_either`] are
/// satisfied by *either* bound. Two overlapping spans can therefore be neither `lt_both`
/// nor `gt_both` of each other while being `le_either` in both directions.
///
/// # Examples
///
/// ```
/// use dwd_opendata::TimeSpan;
///
/// let span = TimeSpan::parse("2019-01-01T00:00", "2018-12-31T12:00", 'T').unwrap();
/// assert_eq!(span.to_string(), "2018-12-31T12:00:00,2019-01-01T00:00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSpan {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeSpan {
    /// Creates a span from two instants in any order.
    pub fn new(a: NaiveDateTime, b: NaiveDateTime) -> Self {
        if a > b {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    /// Span covering the whole days from `first` up to, but excluding, `until`.
    pub fn from_dates(first: NaiveDate, until: NaiveDate) -> Self {
        Self::new(
            first.and_time(chrono::NaiveTime::MIN),
            until.and_time(chrono::NaiveTime::MIN),
        )
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// A span whose bounds coincide holds no instant.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `start <= instant < end`.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Moves both bounds by `minutes` (negative moves into the past).
    pub fn shift(&self, minutes: i64) -> Self {
        Self::new(
            shifted(self.start, minutes),
            shifted(self.end, minutes),
        )
    }

    /// Moves only the start bound. If it would pass the end, the bounds swap.
    ///
    /// `span.shift_start(m).shift_start(-m) == span` holds as long as the first shift
    /// does not cross the end bound.
    pub fn shift_start(&self, minutes: i64) -> Self {
        Self::new(shifted(self.start, minutes), self.end)
    }

    /// Moves only the end bound. If it would pass the start, the bounds swap.
    pub fn shift_end(&self, minutes: i64) -> Self {
        Self::new(self.start, shifted(self.end, minutes))
    }

    /// Both bounds strictly before the other span's bounds.
    pub fn lt_both(&self, other: &TimeSpan) -> bool {
        self.start < other.start && self.end < other.end
    }

    /// Either bound at or before the corresponding bound of `other`.
    pub fn le_either(&self, other: &TimeSpan) -> bool {
        self.start <= other.start || self.end <= other.end
    }

    /// Both bounds strictly after the other span's bounds.
    pub fn gt_both(&self, other: &TimeSpan) -> bool {
        self.start > other.start && self.end > other.end
    }

    /// Either bound at or after the corresponding bound of `other`.
    pub fn ge_either(&self, other: &TimeSpan) -> bool {
        self.start >= other.start || self.end >= other.end
    }

    /// Parses two endpoint strings into a span.
    ///
    /// Only the digits of each string are significant; the date and time formats are
    /// inferred from their counts:
    ///
    /// | digits | date     | | digits | time     |
    /// |--------|----------|-|--------|----------|
    /// | 6      | `yyMMdd` | | 2      | `HH`     |
    /// | 8      | `yyyyMMdd` | | 4    | `HHmm`   |
    /// |        |          | | 6      | `HHmmss` |
    ///
    /// Date and time are split at the first `T`, space or `separator`. Both strings must
    /// have the same length. A `de` marker anywhere in a string reads its date day-first
    /// (`ddMMyy` / `ddMMyyyy`), e.g. `"de 31.12.2000 10:00"`.
    ///
    /// # Errors
    ///
    /// Format errors ([`TimeSpanError::is_format_error`]) for inconsistent lengths, a
    /// missing separator in strings with more than eight digits, or unsupported digit
    /// counts. Range errors for calendar-invalid values such as month 13.
    pub fn parse(start: &str, end: &str, separator: char) -> Result<Self, TimeSpanError> {
        let start_norm = normalize_separator(start, separator);
        let end_norm = normalize_separator(end, separator);
        if start_norm.len() != end_norm.len() {
            return Err(TimeSpanError::InconsistentFormat {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        let a = parse_instant(&start_norm, separator)?;
        let b = parse_instant(&end_norm, separator)?;
        Ok(Self::new(a, b))
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}",
            self.start.format(ISO_FORMAT),
            self.end.format(ISO_FORMAT)
        )
    }
}

fn shifted(instant: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    let delta = Duration::try_minutes(minutes).unwrap_or(if minutes < 0 {
        Duration::MIN
    } else {
        Duration::MAX
    });
    instant
        .checked_add_signed(delta)
        .unwrap_or(if minutes < 0 {
            NaiveDateTime::MIN
        } else {
            NaiveDateTime::MAX
        })
}

pub(crate) fn normalize_separator(text: &str, separator: char) -> String {
    text.trim()
        .chars()
        .map(|c| if c == ' ' || c == separator { 'T' } else { c })
        .collect()
}

fn digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Removes the day-first marker, reporting whether it was present.
fn strip_day_first_marker(text: &str) -> (String, bool) {
    let lower = text.to_ascii_lowercase();
    if !lower.contains(DAY_FIRST_MARKER) {
        return (text.to_string(), false);
    }
    let stripped = lower.replace(DAY_FIRST_MARKER, "").to_ascii_uppercase();
    (stripped.trim_matches('T').to_string(), true)
}

/// Parses a single instant. `text` must already have its separator normalized to `T`.
pub(crate) fn parse_instant(text: &str, separator: char) -> Result<NaiveDateTime, TimeSpanError> {
    let (text, day_first) = strip_day_first_marker(text);
    let text = text.as_str();
    let all_digits = digits(text);
    let (date_part, time_part) = match text.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None if all_digits.len() > 8 => {
            return Err(TimeSpanError::MissingSeparator(text.to_string(), separator))
        }
        None => (text, None),
    };

    let date_digits = digits(date_part);
    let (year, month, day) = match (date_digits.len(), day_first) {
        (6, false) => (
            two_digit_year(&date_digits[0..2]),
            number(&date_digits[2..4]),
            number(&date_digits[4..6]),
        ),
        (6, true) => (
            two_digit_year(&date_digits[4..6]),
            number(&date_digits[2..4]),
            number(&date_digits[0..2]),
        ),
        (8, false) => (
            number(&date_digits[0..4]) as i32,
            number(&date_digits[4..6]),
            number(&date_digits[6..8]),
        ),
        (8, true) => (
            number(&date_digits[4..8]) as i32,
            number(&date_digits[2..4]),
            number(&date_digits[0..2]),
        ),
        (n, _) => {
            return Err(TimeSpanError::UnsupportedWidth {
                input: text.to_string(),
                part: "date",
                digits: n,
            })
        }
    };

    let (hour, minute, second) = match time_part.map(digits) {
        None => (0, 0, 0),
        Some(t) => match t.len() {
            2 => (number(&t[0..2]), 0, 0),
            4 => (number(&t[0..2]), number(&t[2..4]), 0),
            6 => (number(&t[0..2]), number(&t[2..4]), number(&t[4..6])),
            n => {
                return Err(TimeSpanError::UnsupportedWidth {
                    input: text.to_string(),
                    part: "time",
                    digits: n,
                })
            }
        },
    };

    checked_datetime(year, month, day, hour, minute, second)
}

/// Builds an instant, reporting the first calendar field that is out of range.
pub(crate) fn checked_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<NaiveDateTime, TimeSpanError> {
    if !(1..=12).contains(&month) {
        return Err(TimeSpanError::Month(month));
    }
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(TimeSpanError::Day { year, month, day })?;
    if hour > 23 {
        return Err(TimeSpanError::Hour(hour));
    }
    if minute > 59 {
        return Err(TimeSpanError::Minute(minute));
    }
    if second > 59 {
        return Err(TimeSpanError::Second(second));
    }
    date.and_hms_opt(hour, minute, second)
        .ok_or(TimeSpanError::Second(second))
}

fn two_digit_year(digits: &str) -> i32 {
    let yy = number(digits);
    (if yy < 69 { 2000 + yy } else { 1900 + yy }) as i32
}

// Only ever called on ASCII digit slices of length <= 4.
fn number(digits: &str) -> u32 {
    digits.bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}
