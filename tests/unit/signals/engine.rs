//! Unit tests for the confluence evaluator

use chrono::{Duration, TimeZone, Utc};
use confluex::config::SignalParams;
use confluex::models::indicators::{Candle, IndicatorSet, PriceSeries};
use confluex::signals::engine::{ConfluenceEvaluator, MIN_CANDLES, PLACEHOLDER_CONFIDENCE};

fn series_from(closes: &[f64], volumes: &[f64]) -> PriceSeries {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let candles = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| {
            Candle::new(
                close,
                close,
                close,
                close,
                volume,
                base + Duration::minutes(15 * i as i64),
            )
        })
        .collect();
    PriceSeries::new("BTCUSDT", candles).unwrap()
}

fn readings(rsi: Option<f64>, ema_fast: f64, ema_slow: f64, volume_multiplier: f64) -> IndicatorSet {
    IndicatorSet {
        price: 100.0,
        rsi,
        ema_fast,
        ema_slow,
        volume_multiplier,
    }
}

#[test]
fn test_default_min_candles() {
    assert_eq!(SignalParams::default().min_candles(), MIN_CANDLES);
}

#[test]
fn test_evaluate_insufficient_data() {
    let evaluator = ConfluenceEvaluator::default();
    for len in 0..MIN_CANDLES {
        let closes: Vec<f64> = (0..len).map(|i| 100.0 - i as f64).collect();
        let volumes = vec![100.0; len];
        assert!(evaluator.evaluate(&series_from(&closes, &volumes)).is_none());
    }
}

#[test]
fn test_indicators_exact_minimum() {
    let closes: Vec<f64> = (1..=21).map(|i| i as f64).collect();
    let volumes = vec![10.0; 21];
    let ind = ConfluenceEvaluator::default()
        .indicators(&series_from(&closes, &volumes))
        .expect("21 candles is enough");
    assert_eq!(ind.price, 21.0);
    assert_eq!(ind.ema_fast, 17.0);
    assert_eq!(ind.ema_slow, 11.0);
    assert_eq!(ind.rsi, Some(100.0));
    assert_eq!(ind.volume_multiplier, 1.0);
}

#[test]
fn test_tally_counts_conditions() {
    let evaluator = ConfluenceEvaluator::default();
    let (buy, sell) = evaluator.tally(&readings(Some(20.0), 101.0, 100.0, 2.0));
    assert_eq!(buy.count(), 3);
    assert_eq!(sell.count(), 1);

    let (buy, sell) = evaluator.tally(&readings(Some(80.0), 99.0, 100.0, 2.5));
    assert_eq!(buy.count(), 1);
    assert_eq!(sell.count(), 3);
}

#[test]
fn test_tally_undefined_rsi_fails_rsi_condition() {
    let evaluator = ConfluenceEvaluator::default();
    let (buy, sell) = evaluator.tally(&readings(None, 101.0, 100.0, 3.0));
    assert!(!buy.rsi_extreme);
    assert!(!sell.rsi_extreme);
    assert_eq!(buy.count(), 2);
}

#[test]
fn test_tally_boundaries_are_strict_for_rsi_and_inclusive_for_volume() {
    let evaluator = ConfluenceEvaluator::default();
    let (buy, sell) = evaluator.tally(&readings(Some(25.0), 100.0, 100.0, 2.0));
    assert!(!buy.rsi_extreme);
    assert!(!buy.trend_aligned);
    assert!(!sell.trend_aligned);
    assert!(buy.volume_surge);

    let (_, sell) = evaluator.tally(&readings(Some(75.0), 99.0, 100.0, 1.99));
    assert!(!sell.rsi_extreme);
    assert!(!sell.volume_surge);
}

#[test]
fn test_no_signal_on_steady_uptrend_without_surge() {
    let closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
    let volumes = vec![100.0; 50];
    assert!(ConfluenceEvaluator::default()
        .evaluate(&series_from(&closes, &volumes))
        .is_none());
}

#[test]
fn test_placeholder_confidence_constant() {
    assert_eq!(PLACEHOLDER_CONFIDENCE, 70);
}
