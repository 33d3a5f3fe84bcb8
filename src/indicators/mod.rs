//! Indicator library: pure functions over close and volume sequences.

pub mod momentum;
pub mod trend;
pub mod volume;

pub use momentum::{calculate_rsi, calculate_rsi_default};
pub use trend::calculate_sma;
pub use volume::{volume_multiplier, volume_multiplier_default};
