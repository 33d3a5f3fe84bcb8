//! RSI (Relative Strength Index) with Wilder's smoothing

use crate::common::math;

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Calculate RSI over a close-price sequence.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss.
/// The averages are seeded from the first `period` deltas and then smoothed
/// over every remaining delta with weight `1 / period`. Whenever the average
/// loss is exactly zero the reading is 100 if there was any gain, else 0.
///
/// Returns `None` when fewer than `period + 1` closes are available.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let deltas = math::deltas(closes);
    let (seed, rest) = deltas.split_at(period);
    let n = period as f64;

    let mut avg_gain = seed.iter().filter(|d| **d > 0.0).sum::<f64>() / n;
    let mut avg_loss = seed.iter().filter(|d| **d < 0.0).map(|d| d.abs()).sum::<f64>() / n;
    let mut rsi = rsi_from_averages(avg_gain, avg_loss);

    for delta in rest {
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);
        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        rsi = rsi_from_averages(avg_gain, avg_loss);
    }

    Some(rsi)
}

/// Calculate RSI with the default period (14)
pub fn calculate_rsi_default(closes: &[f64]) -> Option<f64> {
    calculate_rsi(closes, DEFAULT_RSI_PERIOD)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { 100.0 } else { 0.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
