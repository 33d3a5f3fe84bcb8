//! Volume indicators

pub mod surge;

pub use surge::*;
