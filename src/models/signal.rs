use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Buy,
    Sell,
}

impl SignalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "BUY",
            SignalDirection::Sell => "SELL",
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three confluence checks, each read from the direction's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    RsiExtreme,
    TrendAligned,
    VolumeSurge,
}

/// A directional alert candidate produced by the confluence evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub symbol: String,
    pub direction: SignalDirection,
    pub price: f64,
    pub rsi: Option<f64>,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub volume_multiplier: f64,
    pub conditions_met: u8,
    pub conditions: Vec<Condition>,
    /// Fixed placeholder score, not a calibrated probability.
    pub confidence: u8,
    pub timestamp: DateTime<Utc>,
}
