//! Duplicate-alert suppression.
//!
//! The default fingerprint is the exact RSI value, so almost every fresh
//! evaluation counts as new. `FingerprintPolicy::Direction` holds an alert back
//! until the direction flips instead.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::AlertError;
use crate::models::signal::{SignalDirection, Verdict};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FingerprintPolicy {
    #[default]
    RsiValue,
    Direction,
}

impl FromStr for FingerprintPolicy {
    type Err = AlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rsi" | "rsi_value" => Ok(FingerprintPolicy::RsiValue),
            "direction" => Ok(FingerprintPolicy::Direction),
            other => Err(AlertError::Config(format!("unknown dedup policy: {:?}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// Bit pattern of the RSI reading; `None` when RSI was undefined.
    Rsi(Option<u64>),
    Direction(SignalDirection),
}

impl Fingerprint {
    pub fn of(verdict: &Verdict, policy: FingerprintPolicy) -> Self {
        match policy {
            FingerprintPolicy::RsiValue => Fingerprint::Rsi(verdict.rsi.map(f64::to_bits)),
            FingerprintPolicy::Direction => Fingerprint::Direction(verdict.direction),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmittedSignal {
    pub fingerprint: Fingerprint,
    pub emitted_at: DateTime<Utc>,
}

/// Last emitted fingerprint per instrument. Lives as long as the worker and
/// is never persisted.
#[derive(Debug, Default)]
pub struct SignalMemory {
    last: HashMap<String, EmittedSignal>,
}

impl SignalMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<&EmittedSignal> {
        self.last.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }

    fn record(&mut self, symbol: &str, signal: EmittedSignal) {
        self.last.insert(symbol.to_string(), signal);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Deduplicator {
    policy: FingerprintPolicy,
}

impl Deduplicator {
    pub fn new(policy: FingerprintPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FingerprintPolicy {
        self.policy
    }

    /// True if `verdict` differs from the last alert emitted for its symbol.
    /// Records the new fingerprint when it does.
    pub fn should_emit(&self, memory: &mut SignalMemory, verdict: &Verdict) -> bool {
        let fingerprint = Fingerprint::of(verdict, self.policy);
        if memory
            .get(&verdict.symbol)
            .is_some_and(|prev| prev.fingerprint == fingerprint)
        {
            return false;
        }

        memory.record(
            &verdict.symbol,
            EmittedSignal {
                fingerprint,
                emitted_at: verdict.timestamp,
            },
        );
        true
    }
}
