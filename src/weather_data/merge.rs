//! Stitches per-vintage frames into one regularly spaced series.

use crate::types::time_span::TimeSpan;
use crate::types::vintage::Vintage;
use crate::weather_data::data_loader::{EOR_COLUMN, TIMESTAMP_COLUMN};
use crate::weather_data::error::WeatherDataError;
use log::debug;
use polars::prelude::*;
use std::collections::BTreeMap;

const MS_PER_MINUTE: i64 = 60_000;

fn millis(column: &str) -> Expr {
    col(column).cast(DataType::Int64)
}

fn last_timestamp(df: &DataFrame) -> Result<Option<i64>, WeatherDataError> {
    let ts = df.column(TIMESTAMP_COLUMN)?.cast(&DataType::Int64)?;
    Ok(ts.i64()?.max())
}

fn append(base: DataFrame, next: DataFrame) -> Result<DataFrame, WeatherDataError> {
    let stacked = concat_lf_diagonal(
        [base.lazy(), next.lazy()],
        UnionArgs {
            to_supertypes: true,
            ..Default::default()
        },
    )?
    .collect()?;
    Ok(stacked)
}

/// The regular grid: every multiple of `step_minutes` since the Unix epoch inside
/// `[span.start, span.end)`.
pub fn regular_grid(span: &TimeSpan, step_minutes: i64) -> Result<DataFrame, WeatherDataError> {
    if step_minutes <= 0 {
        return Err(WeatherDataError::InvalidStep(step_minutes));
    }
    let step = step_minutes * MS_PER_MINUTE;
    let start = span.start().and_utc().timestamp_millis();
    let end = span.end().and_utc().timestamp_millis();
    let first = match start.rem_euclid(step) {
        0 => start,
        rem => start - rem + step,
    };

    let values: Vec<i64> = std::iter::successors(Some(first), |t| Some(t + step))
        .take_while(|t| *t < end)
        .collect();
    let grid = Int64Chunked::from_vec(TIMESTAMP_COLUMN.into(), values)
        .into_datetime(TimeUnit::Milliseconds, None)
        .into_series();
    Ok(DataFrame::new(vec![grid.into_column()])?)
}

/// Merges the frames of several vintages into one series on the native grid.
///
/// Vintages are taken in precedence order (historical, recent, now). The first present
/// one is the base; every following frame only contributes rows after the current last
/// timestamp of the accumulated base, so an earlier vintage always wins where they
/// overlap. The result is clipped to `[span.start, span.end)`, deduplicated on
/// `MESS_DATUM` (first occurrence wins), stripped of the `eor` marker and left-joined
/// onto [`regular_grid`]: missing samples become null rows, samples off the grid are
/// dropped.
///
/// # Errors
///
/// [`WeatherDataError::NoFrames`] for an empty map, [`WeatherDataError::InvalidStep`]
/// for a non-positive step, polars errors if a frame lacks `MESS_DATUM`.
pub fn merge(
    frames: BTreeMap<Vintage, DataFrame>,
    span: &TimeSpan,
    step_minutes: i64,
) -> Result<DataFrame, WeatherDataError> {
    let grid = regular_grid(span, step_minutes)?;
    let mut vintages = frames.into_iter();
    let (first_vintage, mut merged) = vintages.next().ok_or(WeatherDataError::NoFrames)?;
    debug!("Merge base is the {} vintage ({} rows)", first_vintage, merged.height());

    for (vintage, frame) in vintages {
        let newer = match last_timestamp(&merged)? {
            Some(last) => frame
                .lazy()
                .filter(millis(TIMESTAMP_COLUMN).gt(lit(last)))
                .collect()?,
            None => frame,
        };
        debug!("Appending {} rows from the {} vintage", newer.height(), vintage);
        merged = append(merged, newer)?;
    }

    let start = span.start().and_utc().timestamp_millis();
    let end = span.end().and_utc().timestamp_millis();
    let mut merged = merged
        .lazy()
        .filter(
            millis(TIMESTAMP_COLUMN)
                .gt_eq(lit(start))
                .and(millis(TIMESTAMP_COLUMN).lt(lit(end))),
        )
        .unique_stable(
            Some(vec![TIMESTAMP_COLUMN.into()]),
            UniqueKeepStrategy::First,
        )
        .sort([TIMESTAMP_COLUMN], SortMultipleOptions::default())
        .collect()?;
    if merged.get_column_index(EOR_COLUMN).is_some() {
        merged = merged.drop(EOR_COLUMN)?;
    }

    let step = step_minutes * MS_PER_MINUTE;
    let off_grid = merged
        .column(TIMESTAMP_COLUMN)?
        .cast(&DataType::Int64)?
        .i64()?
        .into_iter()
        .flatten()
        .filter(|t| t.rem_euclid(step) != 0)
        .count();
    if off_grid > 0 {
        debug!("Dropping {} samples that are off the {} minute grid", off_grid, step_minutes);
    }

    let joined = grid
        .lazy()
        .join(
            merged.lazy(),
            [col(TIMESTAMP_COLUMN)],
            [col(TIMESTAMP_COLUMN)],
            JoinArgs::new(JoinType::Left),
        )
        .sort([TIMESTAMP_COLUMN], SortMultipleOptions::default())
        .collect()?;
    Ok(joined)
}
