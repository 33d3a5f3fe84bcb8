//! Trend indicators: SMA fast/slow pair

pub mod sma;

pub use sma::*;
