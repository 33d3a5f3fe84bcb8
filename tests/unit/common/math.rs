//! Unit tests for numeric helpers

use confluex::common::math::{deltas, mean, sma};

#[test]
fn test_mean_empty() {
    assert!(mean(&[]).is_none());
}

#[test]
fn test_mean_values() {
    assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]), Some(3.0));
}

#[test]
fn test_sma_uses_trailing_window() {
    let values = [10.0, 1.0, 2.0, 3.0];
    assert_eq!(sma(&values, 3), Some(2.0));
    assert_eq!(sma(&values, 4), Some(4.0));
}

#[test]
fn test_sma_insufficient_or_zero_window() {
    assert!(sma(&[1.0, 2.0], 3).is_none());
    assert!(sma(&[1.0, 2.0], 0).is_none());
}

#[test]
fn test_deltas() {
    assert_eq!(deltas(&[1.0, 3.0, 2.0]), vec![2.0, -1.0]);
    assert!(deltas(&[1.0]).is_empty());
}
