//! Narrowing of archive listings: by station, and for historical archives by the date
//! range embedded in their names.

use crate::types::time_span::TimeSpan;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::warn;

const ARCHIVE_EXTENSION: &str = ".zip";

/// An archive name with the coverage dates it advertises, e.g.
/// `10minutenwerte_FF_00003_19930428_19991231_hist.zip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    pub filename: String,
    pub embedded_start: NaiveDate,
    pub embedded_end: NaiveDate,
}

impl ArchiveFile {
    /// Reads the 4th and 5th `separator`-delimited fields as `YYYYMMDD` dates.
    pub fn parse(filename: &str, separator: char) -> Option<ArchiveFile> {
        let mut fields = filename.split(separator).skip(3);
        let start = NaiveDate::parse_from_str(fields.next()?, "%Y%m%d").ok()?;
        let end = NaiveDate::parse_from_str(fields.next()?, "%Y%m%d").ok()?;
        Some(ArchiveFile {
            filename: filename.to_string(),
            embedded_start: start,
            embedded_end: end,
        })
    }

    /// The archive covers `embedded_start` 00:00 up to the end of `embedded_end`.
    fn overlaps(&self, span: &TimeSpan) -> bool {
        let file_start = midnight(self.embedded_start);
        let file_end = self
            .embedded_end
            .succ_opt()
            .map_or(NaiveDateTime::MAX, midnight);
        let within = |t: NaiveDateTime| span.start() <= t && t <= span.end();
        within(file_end)
            || within(file_start)
            || (file_start <= span.start() && span.end() <= file_end)
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Result of [`filter_by_window`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredArchives {
    pub files: Vec<String>,
    /// Nothing matched and `files` is the unfiltered input.
    pub fell_back: bool,
}

/// Keeps the archives whose embedded range touches `span` (closed on both ends).
///
/// Names whose date fields do not parse never match. If nothing matches, the input is
/// returned unchanged with `fell_back` set, so a caller always has something to try.
pub fn filter_by_window<S: AsRef<str>>(
    filenames: &[S],
    span: &TimeSpan,
    separator: char,
) -> FilteredArchives {
    let files: Vec<String> = filenames
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| {
            ArchiveFile::parse(name, separator).is_some_and(|file| file.overlaps(span))
        })
        .map(str::to_string)
        .collect();

    if files.is_empty() && !filenames.is_empty() {
        warn!(
            "No archive covers {}, keeping all {} archives",
            span,
            filenames.len()
        );
        return FilteredArchives {
            files: filenames.iter().map(|n| n.as_ref().to_string()).collect(),
            fell_back: true,
        };
    }
    FilteredArchives {
        files,
        fell_back: false,
    }
}

/// Zip archives in `listing` that belong to `station_id`.
///
/// The id must equal one of the `_`-separated fields of the name, so `00003` does not
/// match `00030`.
pub fn archives_for_station<S: AsRef<str>>(listing: &[S], station_id: &str) -> Vec<String> {
    listing
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|name| {
            let stem = name.strip_suffix(ARCHIVE_EXTENSION)?;
            stem.split('_')
                .any(|field| field == station_id)
                .then(|| name.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORICAL: [&str; 3] = [
        "10minutenwerte_FF_00003_19930428_19991231_hist.zip",
        "10minutenwerte_FF_00003_20000101_20091231_hist.zip",
        "10minutenwerte_FF_00003_20100101_20110331_hist.zip",
    ];

    fn span(a: (i32, u32, u32), b: (i32, u32, u32)) -> TimeSpan {
        TimeSpan::from_dates(
            NaiveDate::from_ymd_opt(a.0, a.1, a.2).unwrap(),
            NaiveDate::from_ymd_opt(b.0, b.1, b.2).unwrap(),
        )
    }

    #[test]
    fn parses_embedded_dates() {
        let file = ArchiveFile::parse(HISTORICAL[0], '_').unwrap();
        assert_eq!(
            file.embedded_start,
            NaiveDate::from_ymd_opt(1993, 4, 28).unwrap()
        );
        assert_eq!(
            file.embedded_end,
            NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()
        );
        assert_eq!(ArchiveFile::parse("10minutenwerte_FF_00003_akt.zip", '_'), None);
    }

    #[test]
    fn keeps_archives_overlapping_the_span() {
        let filtered = filter_by_window(&HISTORICAL, &span((1999, 6, 1), (2000, 6, 1)), '_');
        assert!(!filtered.fell_back);
        assert_eq!(filtered.files, HISTORICAL[..2].to_vec());

        // span inside a single archive
        let filtered = filter_by_window(&HISTORICAL, &span((2003, 1, 1), (2004, 1, 1)), '_');
        assert_eq!(filtered.files, vec![HISTORICAL[1]]);
    }

    #[test]
    fn kept_archives_satisfy_one_of_the_overlap_rules() {
        let window = span((2009, 12, 31), (2010, 1, 1));
        let filtered = filter_by_window(&HISTORICAL, &window, '_');
        for name in &filtered.files {
            let file = ArchiveFile::parse(name, '_').unwrap();
            assert!(file.overlaps(&window));
        }
        assert_eq!(filtered.files, HISTORICAL[1..].to_vec());
    }

    #[test]
    fn last_day_of_an_archive_counts_until_midnight() {
        let start = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_time(NaiveTime::MIN);
        let filtered = filter_by_window(&HISTORICAL, &TimeSpan::new(start, end), '_');
        assert!(!filtered.fell_back);
        assert_eq!(filtered.files, HISTORICAL[..2].to_vec());
    }

    #[test]
    fn falls_back_to_all_archives_when_nothing_matches() {
        let mut names = HISTORICAL.to_vec();
        names.push("10minutenwerte_FF_00003_garbage_hist.zip");
        let filtered = filter_by_window(&names, &span((2015, 1, 1), (2016, 1, 1)), '_');
        assert!(filtered.fell_back);
        assert_eq!(filtered.files, names);
    }

    #[test]
    fn selects_archives_by_exact_station_field() {
        let listing = [
            "10minutenwerte_FF_00003_akt.zip",
            "10minutenwerte_FF_00030_akt.zip",
            "10minutenwerte_FF_00003_now.txt",
            "BESCHREIBUNG_obsgermany_climate_10min_ff_de.pdf",
        ];
        assert_eq!(
            archives_for_station(&listing, "00003"),
            vec!["10minutenwerte_FF_00003_akt.zip"]
        );
    }
}
