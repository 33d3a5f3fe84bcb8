//! Momentum indicators

pub mod rsi;

pub use rsi::*;
