//! Decides which vintage folders can hold data for a requested span.

use crate::types::time_span::TimeSpan;
use crate::types::vintage::Vintage;
use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeMap;

/// Per vintage: does its staleness window cover the span's start, its end?
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageMatrix {
    entries: BTreeMap<Vintage, (bool, bool)>,
}

impl CoverageMatrix {
    /// `(start_covered, end_covered)` for a listed vintage.
    pub fn get(&self, vintage: Vintage) -> Option<(bool, bool)> {
        self.entries.get(&vintage).copied()
    }

    /// Listed vintages with their flags, in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = (Vintage, (bool, bool))> + '_ {
        self.entries.iter().map(|(v, flags)| (*v, *flags))
    }

    /// Vintages that cover at least one bound, in precedence order.
    pub fn selected(&self) -> Vec<Vintage> {
        self.entries
            .iter()
            .filter(|(_, (start, end))| *start || *end)
            .map(|(vintage, _)| *vintage)
            .collect()
    }
}

/// Classifies the listed sub-folders of a product against `span`.
///
/// A vintage's window runs from `now - max_days_old` to `now - min_days_old`; a bound is
/// covered when it lies strictly inside that window. Non-vintage names such as
/// `meta_data` are ignored. When historical covers the start and now covers the end,
/// recent is marked as covering both, so a span reaching across all three windows
/// never skips the middle one.
pub fn classify<S: AsRef<str>>(
    available_folders: &[S],
    span: &TimeSpan,
    now: NaiveDateTime,
) -> CoverageMatrix {
    let mut entries = BTreeMap::new();
    for vintage in available_folders
        .iter()
        .filter_map(|name| Vintage::from_folder(name.as_ref()))
    {
        let window_start = now - Duration::days(vintage.max_days_old());
        let window_end = now - Duration::days(vintage.min_days_old());
        let covers = |t: NaiveDateTime| window_start < t && t < window_end;
        entries.insert(vintage, (covers(span.start()), covers(span.end())));
    }

    if entries.len() == Vintage::ALL.len() {
        let historical_start = entries.get(&Vintage::Historical).is_some_and(|f| f.0);
        let now_end = entries.get(&Vintage::Now).is_some_and(|f| f.1);
        if historical_start && now_end {
            entries.insert(Vintage::Recent, (true, true));
        }
    }
    CoverageMatrix { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const ALL_FOLDERS: [&str; 4] = ["historical", "meta_data", "now", "recent"];

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn span_in_the_middle_of_recent() {
        let now = dt(2019, 7, 6, 12);
        let span = TimeSpan::new(dt(2019, 1, 1, 0), dt(2019, 2, 1, 0));
        let matrix = classify(&ALL_FOLDERS, &span, now);
        assert_eq!(matrix.get(Vintage::Recent), Some((true, true)));
        assert_eq!(matrix.get(Vintage::Historical), Some((false, false)));
        assert_eq!(matrix.get(Vintage::Now), Some((false, false)));
        assert_eq!(matrix.selected(), vec![Vintage::Recent]);
    }

    #[test]
    fn span_ending_yesterday_selects_historical_and_recent() {
        let now = dt(2019, 7, 6, 12);
        let span = TimeSpan::new(dt(2018, 1, 1, 0), dt(2019, 7, 5, 0));
        let matrix = classify(&ALL_FOLDERS, &span, now);
        assert_eq!(matrix.get(Vintage::Historical), Some((true, false)));
        assert_eq!(matrix.get(Vintage::Recent), Some((false, true)));
        assert_eq!(matrix.get(Vintage::Now), Some((false, false)));
        assert_eq!(
            matrix.selected(),
            vec![Vintage::Historical, Vintage::Recent]
        );
    }

    #[test]
    fn bridging_marks_recent_when_historical_and_now_cover_the_bounds() {
        let now = dt(2019, 7, 6, 12);
        let span = TimeSpan::new(dt(2016, 1, 1, 0), dt(2019, 7, 6, 6));
        let matrix = classify(&ALL_FOLDERS, &span, now);
        assert_eq!(matrix.get(Vintage::Historical), Some((true, false)));
        assert_eq!(matrix.get(Vintage::Now), Some((false, true)));
        assert_eq!(matrix.get(Vintage::Recent), Some((true, true)));
        assert_eq!(
            matrix.selected(),
            vec![Vintage::Historical, Vintage::Recent, Vintage::Now]
        );
    }

    #[test]
    fn no_bridging_without_all_three_folders() {
        let now = dt(2019, 7, 6, 12);
        let span = TimeSpan::new(dt(2016, 1, 1, 0), dt(2019, 7, 6, 6));
        let matrix = classify(&["historical", "now"], &span, now);
        assert_eq!(matrix.get(Vintage::Recent), None);
        assert_eq!(matrix.selected(), vec![Vintage::Historical, Vintage::Now]);
    }

    #[test]
    fn window_bounds_are_exclusive() {
        let now = dt(2019, 7, 6, 12);
        let edge = now - Duration::days(1);
        let span = TimeSpan::new(edge, now);
        let matrix = classify(&["now"], &span, now);
        assert_eq!(matrix.get(Vintage::Now), Some((false, false)));
        assert!(matrix.selected().is_empty());
    }
}
