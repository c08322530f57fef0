use approx::assert_relative_eq;
use chrono::NaiveDate;
use forecast_trade::data::{Bar, BarSeries, BarSource, SyntheticBarSource};
use forecast_trade::features::{FeatureMatrixBuilder, FEATURE_COUNT, FEATURE_WINDOW};
use forecast_trade::utils::future_trading_days;
use rstest::rstest;
use trade_math::volatility::volatility_series;

fn series_from_closes(closes: &[f64], volume: f64) -> BarSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    future_trading_days(start, closes.len())
        .into_iter()
        .zip(closes)
        .map(|(date, &close)| Bar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume,
            adj_close: close,
        })
        .collect::<Vec<_>>()
        .into()
}

#[test]
fn test_constant_series_features() {
    let series = series_from_closes(&[100.0; 60], 40_000_000.0);
    let matrix = FeatureMatrixBuilder::default().build(&series).unwrap();

    assert_eq!(matrix.len(), 60);
    for (i, row) in matrix.rows.iter().enumerate() {
        assert_eq!(row.get("intercept"), Some(1.0));
        assert_eq!(row.get("volatility"), Some(0.0));
        assert_eq!(row.get("price_change"), Some(0.0));
        assert_eq!(row.get("volatility_squared"), Some(0.0));
        assert_eq!(row.get("close_x_volatility"), Some(0.0));
        assert_relative_eq!(row.get("sma_ratio").unwrap(), 1.0);
        assert_relative_eq!(row.get("volume_ratio").unwrap(), 1.0);

        // A flat window saturates once the full RSI lookback is visible
        let expected_rsi = if i >= 13 { 100.0 } else { 50.0 };
        assert_eq!(row.get("rsi"), Some(expected_rsi));
        assert_relative_eq!(row.get("rsi_normalized").unwrap(), (expected_rsi - 50.0) / 50.0);
    }
    assert!(matrix.targets.iter().all(|&close| close == 100.0));
}

#[test]
fn test_short_history_keeps_neutral_rsi() {
    let closes: Vec<f64> = (0..13).map(|i| 50.0 + (i % 4) as f64).collect();
    let series = series_from_closes(&closes, 1_000_000.0);
    let matrix = FeatureMatrixBuilder::default().build(&series).unwrap();

    assert_eq!(matrix.len(), 13);
    for row in &matrix.rows {
        assert_eq!(row.get("rsi"), Some(50.0));
        assert_eq!(row.get("rsi_normalized"), Some(0.0));
        assert_relative_eq!(row.get("sma5_x_rsi").unwrap(), row.get("sma5").unwrap() * 0.5);
    }
}

#[rstest]
#[case(1, 1)]
#[case(59, 59)]
#[case(60, 60)]
#[case(61, 60)]
#[case(300, 60)]
fn test_window_caps_rows(#[case] bars: usize, #[case] expected_rows: usize) {
    let end = NaiveDate::from_ymd_opt(2024, 8, 30).unwrap();
    let series = SyntheticBarSource::new(end, bars).with_seed(1).load().unwrap();
    let matrix = FeatureMatrixBuilder::default().build(&series).unwrap();

    assert_eq!(matrix.len(), expected_rows);
    assert_eq!(matrix.targets.len(), expected_rows);
    assert_eq!(
        matrix.targets.last().copied(),
        series.last().map(|bar| bar.close)
    );
    assert!(matrix.rows.iter().all(|row| row.0.len() == FEATURE_COUNT));
}

#[test]
fn test_first_row_of_window_has_no_change() {
    // Change features restart at the first bar of the window
    let end = NaiveDate::from_ymd_opt(2024, 8, 30).unwrap();
    let series = SyntheticBarSource::new(end, 200).with_seed(2).load().unwrap();
    let matrix = FeatureMatrixBuilder::default().build(&series).unwrap();

    let first = &matrix.rows[0];
    assert_eq!(first.get("price_change"), Some(0.0));
    assert_eq!(first.get("volatility"), Some(0.0));
    assert_relative_eq!(first.get("sma5").unwrap(), first.get("close").unwrap());
    assert_relative_eq!(first.get("sma20").unwrap(), first.get("close").unwrap());
}

#[test]
fn test_derived_columns_follow_base_columns() {
    let end = NaiveDate::from_ymd_opt(2024, 8, 30).unwrap();
    let series = SyntheticBarSource::new(end, FEATURE_WINDOW).with_seed(5).load().unwrap();
    let matrix = FeatureMatrixBuilder::with_window(FEATURE_WINDOW)
        .build(&series)
        .unwrap();

    let volatilities = volatility_series(&matrix.targets).unwrap();
    for (row, expected_volatility) in matrix.rows.iter().zip(volatilities) {
        assert_relative_eq!(row.get("volatility").unwrap(), expected_volatility);
        let close = row.get("close").unwrap();
        let sma5 = row.get("sma5").unwrap();
        let sma20 = row.get("sma20").unwrap();
        let rsi = row.get("rsi").unwrap();
        let volatility = row.get("volatility").unwrap();

        assert!((0.0..=100.0).contains(&rsi));
        assert_relative_eq!(volatility, row.get("price_change").unwrap().abs());
        assert_relative_eq!(row.get("sma_ratio").unwrap(), sma5 / sma20);
        assert_relative_eq!(row.get("volatility_squared").unwrap(), volatility * volatility);
        assert_relative_eq!(row.get("close_x_volatility").unwrap(), close * volatility);
        assert_relative_eq!(row.get("sma5_x_rsi").unwrap(), sma5 * rsi / 100.0);
    }
}

#[test]
fn test_empty_series_builds_empty_matrix() {
    let matrix = FeatureMatrixBuilder::default()
        .build(&BarSeries::default())
        .unwrap();
    assert!(matrix.is_empty());
    assert!(matrix.targets.is_empty());
}
