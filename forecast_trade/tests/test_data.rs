use chrono::{Datelike, NaiveDate, Weekday};
use forecast_trade::data::{BarSeries, BarSource, CsvBarSource, SyntheticBarSource};
use forecast_trade::ForecastError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_csv_source_reads_exported_history() {
    let file = write_csv(
        "Date,Open,High,Low,Close,Adj Close,Volume\n\
         2024-03-06,10.0,10.5,9.8,10.2,10.1,1200000\n\
         2024-03-04,9.5,10.1,9.4,9.9,9.8,1000000\n\
         2024-03-05,9.9,10.2,9.7,10.0,,1100000\n",
    );

    let series = CsvBarSource::new(file.path()).load().unwrap();

    let dates: Vec<NaiveDate> = series.bars().iter().map(|bar| bar.date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
        ]
    );
    assert_eq!(series.closes(), vec![9.9, 10.0, 10.2]);
    // Missing adjusted close falls back to the close
    assert_eq!(series.bars()[1].adj_close, 10.0);
    assert_eq!(series.bars()[0].adj_close, 9.8);
    assert_eq!(series.volumes(), vec![1_000_000.0, 1_100_000.0, 1_200_000.0]);
}

#[test]
fn test_csv_source_skips_bad_rows() {
    let file = write_csv(
        "date,open,high,low,close,volume\n\
         2024-03-08,10.0,10.5,9.8,10.2,1200000\n\
         2024-03-09,10.2,10.4,10.0,10.3,900000\n\
         not-a-date,1,1,1,1,1\n\
         2024-03-11,10.3,10.6,10.1,abc,1000000\n\
         2024-03-12,10.3,10.6,10.1,0.0,1000000\n\
         2024-03-13,10.3,10.6,10.1,10.4,1000000\n\
         2024-03-13,10.3,10.6,10.1,10.4,1000000\n",
    );

    let series = CsvBarSource::new(file.path()).load().unwrap();

    assert_eq!(series.len(), 2);
    assert!(series
        .bars()
        .iter()
        .all(|bar| bar.date.weekday() != Weekday::Sat && bar.date.weekday() != Weekday::Sun));
    assert_eq!(series.closes(), vec![10.2, 10.4]);
}

#[test]
fn test_csv_source_with_only_bad_rows_fails() {
    let file = write_csv(
        "date,open,high,low,close,volume\n\
         2024-03-09,10.2,10.4,10.0,10.3,900000\n\
         2024-03-10,10.2,10.4,10.0,10.3,900000\n",
    );

    let result = CsvBarSource::new(file.path()).load();
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_csv_source_header_only_is_empty() {
    let file = write_csv("date,open,high,low,close,volume\n");
    let series = CsvBarSource::new(file.path()).load().unwrap();
    assert!(series.is_empty());
}

#[test]
fn test_csv_source_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = CsvBarSource::new(dir.path().join("missing.csv"));

    assert!(source.name().starts_with("csv:"));
    assert!(matches!(source.load(), Err(ForecastError::IoError(_))));
}

#[test]
fn test_synthetic_source_shape() {
    let end = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(); // Sunday
    let series = SyntheticBarSource::new(end, 40)
        .with_start_price(250.0)
        .with_seed(11)
        .load()
        .unwrap();

    assert_eq!(series.len(), 40);
    assert_eq!(series.bars()[0].close, 250.0);
    assert!(series.last().unwrap().date <= end);

    for pair in series.bars().windows(2) {
        assert!(pair[0].date < pair[1].date);
    }
    for bar in series.bars() {
        assert!(bar.close > 0.0);
        assert!(bar.volume > 0.0);
        assert!(bar.low <= bar.high);
        assert!(!matches!(bar.date.weekday(), Weekday::Sat | Weekday::Sun));
    }
}

#[test]
fn test_synthetic_source_is_reproducible() {
    let end = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
    let a = SyntheticBarSource::new(end, 30).with_seed(3).load().unwrap();
    let b = SyntheticBarSource::new(end, 30).with_seed(3).load().unwrap();
    let c = SyntheticBarSource::new(end, 30).with_seed(4).load().unwrap();

    assert_eq!(a, b);
    assert_ne!(a.closes(), c.closes());
}

#[test]
fn test_synthetic_source_rejects_bad_settings() {
    let end = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
    assert!(SyntheticBarSource::new(end, 10)
        .with_start_price(0.0)
        .load()
        .is_err());
    assert!(SyntheticBarSource::new(end, 10)
        .with_returns(0.0, -1.0)
        .load()
        .is_err());
}

#[test]
fn test_series_split_and_trailing() {
    let end = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
    let series = SyntheticBarSource::new(end, 25).with_seed(9).load().unwrap();

    let (head, tail) = series.split_at(20);
    assert_eq!(head.len(), 20);
    assert_eq!(tail.len(), 5);
    assert_eq!(tail.last(), series.last());

    assert_eq!(series.trailing(3), &series.bars()[22..]);
    assert_eq!(series.trailing(100).len(), 25);
    assert!(BarSeries::default().trailing(5).is_empty());
}
