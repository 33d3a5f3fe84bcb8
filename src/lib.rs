//! Confluence alert engine: indicators, verdicts, deduplication and the
//! polling worker that ties them to market data and notifications.

pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use error::AlertError;
