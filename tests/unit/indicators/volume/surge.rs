//! Unit tests for the volume multiplier

use confluex::indicators::volume::{volume_multiplier, volume_multiplier_default};

#[test]
fn test_multiplier_includes_current_volume_in_mean() {
    let volumes = [100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 500.0];
    // mean of last five = (4 * 100 + 500) / 5 = 180
    let mult = volume_multiplier_default(&volumes);
    assert!((mult - 500.0 / 180.0).abs() < 1e-12);
}

#[test]
fn test_multiplier_steady_volume_is_one() {
    assert_eq!(volume_multiplier(&[250.0; 10], 5), 1.0);
}

#[test]
fn test_multiplier_zero_average_is_zero() {
    assert_eq!(volume_multiplier_default(&[0.0; 10]), 0.0);
}

#[test]
fn test_multiplier_empty_is_zero() {
    assert_eq!(volume_multiplier_default(&[]), 0.0);
}

#[test]
fn test_multiplier_ignores_older_volumes() {
    let volumes = [1_000_000.0, 10.0, 10.0, 10.0, 10.0, 10.0];
    assert_eq!(volume_multiplier(&volumes, 5), 1.0);
}
