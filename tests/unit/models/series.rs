//! Unit tests for price series and kline intervals

use chrono::{Duration, TimeZone, Utc};
use confluex::models::indicators::{Candle, KlineInterval, PriceSeries};
use confluex::AlertError;

fn candles_every(step_minutes: i64, count: usize) -> Vec<Candle> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let price = 10.0 + i as f64;
            Candle::new(
                price,
                price,
                price,
                price,
                1.0,
                base + Duration::minutes(step_minutes * i as i64),
            )
        })
        .collect()
}

#[test]
fn test_series_accepts_ascending() {
    let series = PriceSeries::new("BTCUSDT", candles_every(15, 5)).unwrap();
    assert_eq!(series.len(), 5);
    assert_eq!(series.symbol(), "BTCUSDT");
    assert_eq!(series.closes(), vec![10.0, 11.0, 12.0, 13.0, 14.0]);
    assert_eq!(series.last().map(|c| c.close), Some(14.0));
}

#[test]
fn test_series_rejects_unordered() {
    let mut candles = candles_every(15, 5);
    candles.swap(1, 3);
    let err = PriceSeries::new("BTCUSDT", candles).unwrap_err();
    assert!(matches!(err, AlertError::InvalidSeries { .. }));
}

#[test]
fn test_series_rejects_duplicate_timestamps() {
    let mut candles = candles_every(15, 3);
    candles[2].timestamp = candles[1].timestamp;
    assert!(PriceSeries::new("BTCUSDT", candles).is_err());
}

#[test]
fn test_contiguous_detects_gap() {
    let mut candles = candles_every(15, 6);
    candles.remove(3);
    let err = PriceSeries::contiguous("ETHUSDT", candles, KlineInterval::Minutes(15)).unwrap_err();
    assert!(err.to_string().contains("gap"));
}

#[test]
fn test_contiguous_accepts_regular_spacing() {
    let series =
        PriceSeries::contiguous("ETHUSDT", candles_every(60, 6), KlineInterval::Minutes(60));
    assert!(series.is_ok());
}

#[test]
fn test_empty_series_is_valid() {
    let series = PriceSeries::new("ETHUSDT", Vec::new()).unwrap();
    assert!(series.is_empty());
}

#[test]
fn test_kline_interval_parsing() {
    assert_eq!("15".parse::<KlineInterval>().unwrap(), KlineInterval::Minutes(15));
    assert_eq!("D".parse::<KlineInterval>().unwrap(), KlineInterval::Day);
    assert_eq!("w".parse::<KlineInterval>().unwrap(), KlineInterval::Week);
    assert!("7".parse::<KlineInterval>().is_err());
    assert!("M".parse::<KlineInterval>().is_err());
}

#[test]
fn test_kline_interval_wire_and_label() {
    assert_eq!(KlineInterval::Minutes(15).as_str(), "15");
    assert_eq!(KlineInterval::Minutes(15).label(), "15m");
    assert_eq!(KlineInterval::Minutes(240).label(), "4h");
    assert_eq!(KlineInterval::Day.as_str(), "D");
    assert_eq!(KlineInterval::Minutes(5).duration(), Duration::minutes(5));
}
