//! Moving averages used as the fast/slow trend proxy

use crate::common::math;

/// Arithmetic mean of the last `window` closes.
///
/// `None` when `window` is zero or there are fewer than `window` closes.
pub fn calculate_sma(closes: &[f64], window: usize) -> Option<f64> {
    math::sma(closes, window)
}
