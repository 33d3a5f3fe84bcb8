//! Confluence signal engine: evaluation, deduplication and alert rendering.

pub mod dedup;
pub mod engine;
pub mod formatter;

pub use dedup::{Deduplicator, FingerprintPolicy, SignalMemory};
pub use engine::{ConfluenceEvaluator, PLACEHOLDER_CONFIDENCE};
pub use formatter::{format_alert, TradeLevels};
