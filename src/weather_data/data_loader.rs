//! Turns downloaded archive bytes into typed polars frames.
//!
//! Each DWD archive holds a single `produkt_*.txt` table: `;`-separated, padded with
//! spaces, `-999` for missing values and `MESS_DATUM` as compact local digits
//! (`YYYYMMDDHHMM` for sub-hourly products, `YYYYMMDDHH` hourly, `YYYYMMDD` daily).

use crate::utils::decode_latin1;
use crate::weather_data::error::WeatherDataError;
use ::zip::ZipArchive;
use log::debug;
use polars::prelude::*;
use std::io::{Cursor, Read};

pub const TIMESTAMP_COLUMN: &str = "MESS_DATUM";
pub const STATION_COLUMN: &str = "STATIONS_ID";
pub const EOR_COLUMN: &str = "eor";
pub const FAULT_VALUE: f64 = -999.0;

const PRODUCT_PREFIX: &str = "produkt";
const COMPACT_FORMAT: &str = "%Y%m%d%H%M";

/// Reads the product table out of a zip archive.
pub fn extract_product_text(archive_name: &str, bytes: &[u8]) -> Result<String, WeatherDataError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| WeatherDataError::ZipArchive(archive_name.to_string(), e))?;

    let entry_name = archive
        .file_names()
        .find(|name| {
            let lower = name.to_ascii_lowercase();
            lower.starts_with(PRODUCT_PREFIX) && lower.ends_with(".txt")
        })
        .map(str::to_string)
        .ok_or_else(|| WeatherDataError::MissingProductFile(archive_name.to_string()))?;

    let mut entry = archive
        .by_name(&entry_name)
        .map_err(|e| WeatherDataError::ZipArchive(archive_name.to_string(), e))?;
    let mut raw = Vec::new();
    entry
        .read_to_end(&mut raw)
        .map_err(|e| WeatherDataError::ProductRead {
            archive: archive_name.to_string(),
            entry: entry_name.clone(),
            source: e,
        })?;
    Ok(decode_latin1(&raw))
}

fn trimmed(name: &str) -> Expr {
    col(name).str().strip_chars(lit(NULL))
}

/// `MESS_DATUM` digits padded to `YYYYMMDDHHMM` by their width and parsed. Other widths
/// and non-digits become null.
fn compact_timestamp(name: &str) -> Expr {
    let width = trimmed(name).str().len_chars();
    let value = trimmed(name).cast(DataType::Int64);
    when(width.clone().eq(lit(12u32)))
        .then(value.clone())
        .when(width.clone().eq(lit(10u32)))
        .then(value.clone() * lit(100i64))
        .when(width.eq(lit(8u32)))
        .then(value * lit(10_000i64))
        .otherwise(lit(NULL).cast(DataType::Int64))
        .cast(DataType::String)
        .str()
        .to_datetime(
            Some(TimeUnit::Milliseconds),
            None,
            StrptimeOptions {
                format: Some(COMPACT_FORMAT.into()),
                strict: false,
                exact: true,
                cache: true,
            },
            lit("raise"),
        )
        .alias(name)
}

/// Trimmed and cast to `dtype`, with the fault value as null.
fn measurement(name: &str, dtype: DataType, fault: Expr) -> Expr {
    let value = trimmed(name).cast(dtype.clone());
    when(value.clone().eq(fault))
        .then(lit(NULL).cast(dtype))
        .otherwise(value)
        .alias(name)
}

fn column_cast(name: &str) -> Expr {
    match name {
        TIMESTAMP_COLUMN => compact_timestamp(name),
        STATION_COLUMN => trimmed(name).cast(DataType::Int64).alias(name),
        EOR_COLUMN => trimmed(name).alias(name),
        quality if quality.starts_with("QN") => {
            measurement(name, DataType::Int64, lit(FAULT_VALUE as i64))
        }
        _ => measurement(name, DataType::Float64, lit(FAULT_VALUE)),
    }
}

/// Parses the product table of one archive into a frame with a `Datetime[ms]`
/// `MESS_DATUM`, `Int64` station and quality columns, `Float64` measurements and the
/// raw `eor` marker. Missing values are null, rows without a valid timestamp are dropped.
pub fn parse_product_table(text: &str, archive_name: &str) -> Result<DataFrame, WeatherDataError> {
    if text.trim().is_empty() {
        return Err(WeatherDataError::EmptyTable(archive_name.to_string()));
    }
    let mut raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(b';')
                .with_truncate_ragged_lines(true),
        )
        .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
        .finish()
        .map_err(|e| WeatherDataError::CsvReadPolars {
            archive: archive_name.to_string(),
            source: e,
        })?;

    // header fields are padded like the values
    let names: Vec<String> = raw
        .get_column_names()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    raw.set_column_names(names.iter().map(String::as_str))?;
    if !names.iter().any(|name| name == TIMESTAMP_COLUMN) {
        return Err(WeatherDataError::MissingColumnError {
            archive: archive_name.to_string(),
            column: TIMESTAMP_COLUMN.to_string(),
        });
    }

    let rows = raw.height();
    let casts: Vec<Expr> = names.iter().map(|name| column_cast(name)).collect();
    let frame = raw
        .lazy()
        .with_columns(casts)
        .filter(col(TIMESTAMP_COLUMN).is_not_null())
        .sort([TIMESTAMP_COLUMN], SortMultipleOptions::default())
        .collect()?;
    if frame.height() < rows {
        debug!(
            "Skipped {} rows without a valid {} in '{}'",
            rows - frame.height(),
            TIMESTAMP_COLUMN,
            archive_name
        );
    }
    Ok(frame)
}

/// Extracts and parses one downloaded archive.
pub fn load_archive(archive_name: &str, bytes: &[u8]) -> Result<DataFrame, WeatherDataError> {
    let text = extract_product_text(archive_name, bytes)?;
    parse_product_table(&text, archive_name)
}

/// Stacks the frames of several archives of one vintage, ordered by timestamp.
///
/// Columns missing from some archives are filled with nulls.
pub fn concat_frames(frames: Vec<DataFrame>) -> Result<Option<DataFrame>, WeatherDataError> {
    if frames.len() <= 1 {
        return Ok(frames.into_iter().next());
    }
    let lazy: Vec<LazyFrame> = frames.into_iter().map(DataFrame::lazy).collect();
    let stacked = concat_lf_diagonal(
        lazy,
        UnionArgs {
            to_supertypes: true,
            ..Default::default()
        },
    )?
    .sort([TIMESTAMP_COLUMN], SortMultipleOptions::default())
    .collect()?;
    Ok(Some(stacked))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use ::zip::write::SimpleFileOptions;
    use ::zip::ZipWriter;

    pub(crate) fn zip_product(entry: &str, table: &str) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("Metadaten_Geographie_00003.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"Stations_id;Stationshoehe\n3;202\n").unwrap();
        writer
            .start_file(entry, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(table.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    const TABLE: &str = "\
STATIONS_ID;MESS_DATUM;  QN;FF_10;DD_10;eor
          3;199304281230;    1;   3.6; 240;eor
          3;199304281240;    1;-999; 250;eor
          3;garbage;    1;   3.0; 250;eor
          3;199304281220;    1;   3.1;-999;eor
";

    fn ms(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis()
    }

    fn timestamps(df: &DataFrame) -> Vec<Option<i64>> {
        df.column(TIMESTAMP_COLUMN)
            .unwrap()
            .cast(&DataType::Int64)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn compact_timestamps_by_width() {
        let table = "\
STATIONS_ID;MESS_DATUM;TT_TU;eor
3;201901021300;1.0;eor
3;2019010214;2.0;eor
3;20190103;3.0;eor
3;2019010;4.0;eor
";
        let df = parse_product_table(table, "widths.zip").unwrap();
        assert_eq!(
            timestamps(&df),
            vec![
                Some(ms(2019, 1, 2, 13, 0)),
                Some(ms(2019, 1, 2, 14, 0)),
                Some(ms(2019, 1, 3, 0, 0)),
            ]
        );
    }

    #[test]
    fn normalizes_fault_values_and_timestamps() {
        let df = parse_product_table(TABLE, "test.zip").unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["STATIONS_ID", "MESS_DATUM", "QN", "FF_10", "DD_10", "eor"]);
        assert_eq!(
            timestamps(&df),
            vec![
                Some(ms(1993, 4, 28, 12, 20)),
                Some(ms(1993, 4, 28, 12, 30)),
                Some(ms(1993, 4, 28, 12, 40)),
            ]
        );
        let eor = df.column(EOR_COLUMN).unwrap().str().unwrap();
        assert_eq!(eor.get(0), Some("eor"));
    }

    #[test]
    fn missing_timestamp_column_is_an_error() {
        let err = parse_product_table("STATIONS_ID;FF_10\n3;1.0\n", "x.zip").unwrap_err();
        assert!(matches!(err, WeatherDataError::MissingColumnError { .. }));
        let err = parse_product_table("\n\n", "x.zip").unwrap_err();
        assert!(matches!(err, WeatherDataError::EmptyTable(_)));
    }

    #[test]
    fn parses_typed_frame_sorted_by_time() {
        let df = parse_product_table(TABLE, "test.zip").unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(
            df.column(TIMESTAMP_COLUMN).unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(df.column(STATION_COLUMN).unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("QN").unwrap().dtype(), &DataType::Int64);

        let speed: Vec<Option<f64>> = df
            .column("FF_10")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(speed, vec![Some(3.1), Some(3.6), None]);

        let direction = df.column("DD_10").unwrap().f64().unwrap();
        assert_eq!(direction.get(0), None);
        assert_eq!(direction.get(1), Some(240.0));
    }

    #[test]
    fn extracts_product_entry_from_archive() {
        let bytes = zip_product("produkt_zehn_min_ff_19930428_19991231_00003.txt", TABLE);
        let text = extract_product_text("a.zip", &bytes).unwrap();
        assert!(text.starts_with("STATIONS_ID;MESS_DATUM"));

        let df = load_archive("a.zip", &bytes).unwrap();
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn archive_without_product_is_an_error() {
        let bytes = zip_product("readme.txt", TABLE);
        let err = extract_product_text("a.zip", &bytes).unwrap_err();
        assert!(matches!(err, WeatherDataError::MissingProductFile(_)));

        let err = extract_product_text("b.zip", b"not a zip").unwrap_err();
        assert!(matches!(err, WeatherDataError::ZipArchive(..)));
    }

    #[test]
    fn concatenates_archives_diagonally() {
        let a = parse_product_table(TABLE, "a.zip").unwrap();
        let b = parse_product_table(
            "STATIONS_ID;MESS_DATUM;QN;FF_10;eor\n3;199304281300;1;4.0;eor\n",
            "b.zip",
        )
        .unwrap();
        let stacked = concat_frames(vec![b, a]).unwrap().unwrap();
        assert_eq!(stacked.height(), 4);
        let direction = stacked.column("DD_10").unwrap().f64().unwrap();
        assert_eq!(direction.get(3), None);
        assert!(concat_frames(Vec::new()).unwrap().is_none());
    }
}
