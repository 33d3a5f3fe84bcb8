//! Volume surge detection

use crate::common::math;

pub const DEFAULT_VOLUME_WINDOW: usize = 5;

/// Ratio of the latest volume to the mean of the trailing `window` volumes,
/// the latest one included.
///
/// Returns 0 when there is no volume data or the trailing mean is zero, which
/// reads as "no surge" rather than an error.
pub fn volume_multiplier(volumes: &[f64], window: usize) -> f64 {
    let Some(&current) = volumes.last() else {
        return 0.0;
    };
    let start = volumes.len().saturating_sub(window.max(1));
    match math::mean(&volumes[start..]) {
        Some(avg) if avg > 0.0 => current / avg,
        _ => 0.0,
    }
}

/// Volume multiplier with the default window (5)
pub fn volume_multiplier_default(volumes: &[f64]) -> f64 {
    volume_multiplier(volumes, DEFAULT_VOLUME_WINDOW)
}
