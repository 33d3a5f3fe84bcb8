//! Unit tests for the fast/slow moving averages

use confluex::indicators::trend::calculate_sma;

#[test]
fn test_sma_insufficient_data() {
    let closes = vec![1.0; 8];
    assert!(calculate_sma(&closes, 9).is_none());
}

#[test]
fn test_sma_last_window_only() {
    let closes: Vec<f64> = (1..=21).map(|i| i as f64).collect();
    assert_eq!(calculate_sma(&closes, 9), Some(17.0));
    assert_eq!(calculate_sma(&closes, 21), Some(11.0));
}
