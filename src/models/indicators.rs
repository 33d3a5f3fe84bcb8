use crate::error::AlertError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One closed, time-bucketed OHLCV observation. `timestamp` is the bucket start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }
}

/// Candle bucket size as understood by the Bybit v5 kline endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KlineInterval {
    Minutes(u32),
    Day,
    Week,
}

impl KlineInterval {
    const MINUTE_STEPS: [u32; 10] = [1, 3, 5, 15, 30, 60, 120, 240, 360, 720];

    pub fn as_str(&self) -> String {
        match self {
            KlineInterval::Minutes(m) => m.to_string(),
            KlineInterval::Day => "D".to_string(),
            KlineInterval::Week => "W".to_string(),
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            KlineInterval::Minutes(m) => Duration::minutes(i64::from(*m)),
            KlineInterval::Day => Duration::days(1),
            KlineInterval::Week => Duration::weeks(1),
        }
    }

    /// Short human label, e.g. `15m`, `1h`, `1d`.
    pub fn label(&self) -> String {
        match self {
            KlineInterval::Minutes(m) if m % 60 == 0 => format!("{}h", m / 60),
            KlineInterval::Minutes(m) => format!("{}m", m),
            KlineInterval::Day => "1d".to_string(),
            KlineInterval::Week => "1w".to_string(),
        }
    }
}

impl fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for KlineInterval {
    type Err = AlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "D" | "d" => Ok(KlineInterval::Day),
            "W" | "w" => Ok(KlineInterval::Week),
            raw => match raw.parse::<u32>() {
                Ok(m) if Self::MINUTE_STEPS.contains(&m) => Ok(KlineInterval::Minutes(m)),
                _ => Err(AlertError::Config(format!("unsupported kline interval: {:?}", raw))),
            },
        }
    }
}

/// Time-ordered candles for one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    candles: Vec<Candle>,
}

impl PriceSeries {
    /// Wrap candles for `symbol`, rejecting anything not strictly ascending in time.
    pub fn new(symbol: impl Into<String>, candles: Vec<Candle>) -> Result<Self, AlertError> {
        let symbol = symbol.into();
        if let Some(pos) = candles
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(AlertError::InvalidSeries {
                symbol,
                reason: format!("candle {} is not after its predecessor", pos + 1),
            });
        }
        Ok(Self { symbol, candles })
    }

    /// Like [`PriceSeries::new`], additionally requiring consecutive candles to be
    /// exactly one `interval` apart.
    pub fn contiguous(
        symbol: impl Into<String>,
        candles: Vec<Candle>,
        interval: KlineInterval,
    ) -> Result<Self, AlertError> {
        let series = Self::new(symbol, candles)?;
        let step = interval.duration();
        if let Some(pos) = series
            .candles
            .windows(2)
            .position(|pair| pair[1].timestamp - pair[0].timestamp != step)
        {
            return Err(AlertError::InvalidSeries {
                symbol: series.symbol,
                reason: format!("gap in candle sequence after index {}", pos),
            });
        }
        Ok(series)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }
}

/// Indicator readings derived from one evaluation; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub volume_multiplier: f64,
}
