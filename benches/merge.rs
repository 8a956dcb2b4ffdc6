use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dwd_opendata::{merge, TimeSpan, Vintage, EOR_COLUMN, TIMESTAMP_COLUMN};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Ten-minute frame from `start` with `rows` samples.
fn vintage_frame(start: NaiveDateTime, rows: usize, value: f64) -> DataFrame {
    let first = start.and_utc().timestamp_millis();
    let ts: Vec<i64> = (0..rows as i64).map(|i| first + i * 600_000).collect();
    DataFrame::new(vec![
        Int64Chunked::from_vec(TIMESTAMP_COLUMN.into(), ts)
            .into_datetime(TimeUnit::Milliseconds, None)
            .into_series()
            .into_column(),
        Column::new("FF_10".into(), vec![value; rows]),
        Column::new(EOR_COLUMN.into(), vec!["eor"; rows]),
    ])
    .unwrap()
}

fn bench_merge(c: &mut Criterion) {
    let start = NaiveDate::from_ymd_opt(2018, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let year = 6 * 24 * 365;
    let historical = vintage_frame(start, year, 1.0);
    let recent = vintage_frame(start + Duration::days(300), year, 2.0);
    let now = vintage_frame(start + Duration::days(664), 6 * 24, 3.0);
    let span = TimeSpan::new(start, start + Duration::days(665));

    c.bench_function("merge_three_vintages", |b| {
        b.iter(|| {
            let frames = BTreeMap::from([
                (Vintage::Historical, historical.clone()),
                (Vintage::Recent, recent.clone()),
                (Vintage::Now, now.clone()),
            ]);
            merge(black_box(frames), black_box(&span), 10)
        })
    });
}

criterion_group!(benches, bench_merge);
criterion_main!(benches);
