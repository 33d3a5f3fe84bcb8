//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod signal;

pub use indicators::{Candle, IndicatorSet, KlineInterval, PriceSeries};
pub use signal::{Condition, SignalDirection, Verdict};
