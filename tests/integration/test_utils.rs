use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use confluex::models::indicators::{Candle, KlineInterval};
use confluex::services::market_data::MarketDataProvider;
use confluex::services::notifier::Notifier;
use confluex::AlertError;

pub const BUCKET_MS: i64 = 15 * 60 * 1000;

/// Sell-off, base, then a fading bounce. With a volume spike on the last
/// candle this is a textbook BUY confluence.
pub fn oversold_bounce_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..15).map(|i| 200.0 - 5.0 * i as f64).collect();
    closes.extend(std::iter::repeat(130.0).take(6));
    closes.extend((0..9).map(|i| 140.0 - 0.5 * i as f64));
    closes
}

pub fn surge_volumes(count: usize) -> Vec<f64> {
    let mut volumes = vec![100.0; count - 1];
    volumes.push(500.0);
    volumes
}

/// Start of the 15m bucket that is currently open.
pub fn open_bucket_start() -> DateTime<Utc> {
    let now = Utc::now().timestamp_millis();
    DateTime::from_timestamp((now - now % BUCKET_MS) / 1000, 0).unwrap()
}

/// Closed 15m candles ending right before the open bucket.
pub fn closed_candles(closes: &[f64], volumes: &[f64]) -> Vec<Candle> {
    let open = open_bucket_start();
    let n = closes.len() as i64;
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| {
            let start = open - Duration::minutes(15 * (n - i as i64));
            Candle::new(close, close + 1.0, close - 1.0, close, volume, start)
        })
        .collect()
}

/// Candles rendered as Bybit kline rows, newest first.
pub fn bybit_rows(candles: &[Candle]) -> Vec<Vec<String>> {
    candles
        .iter()
        .rev()
        .map(|c| {
            vec![
                c.timestamp.timestamp_millis().to_string(),
                c.open.to_string(),
                c.high.to_string(),
                c.low.to_string(),
                c.close.to_string(),
                c.volume.to_string(),
                (c.close * c.volume).to_string(),
            ]
        })
        .collect()
}

/// Market data served from memory; symbols without an entry fail.
#[derive(Default)]
pub struct FakeProvider {
    candles: Mutex<HashMap<String, Vec<Candle>>>,
    panic_on: Mutex<Option<String>>,
}

impl FakeProvider {
    pub fn with(self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.candles.lock().unwrap().insert(symbol.to_string(), candles);
        self
    }

    pub fn set(&self, symbol: &str, candles: Vec<Candle>) {
        self.candles.lock().unwrap().insert(symbol.to_string(), candles);
    }

    /// Make requests for `symbol` panic (or stop panicking with `None`).
    pub fn panic_on(&self, symbol: Option<&str>) {
        *self.panic_on.lock().unwrap() = symbol.map(str::to_string);
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for FakeProvider {
    async fn get_candles(
        &self,
        symbol: &str,
        _interval: KlineInterval,
        _limit: usize,
    ) -> Result<Vec<Candle>, AlertError> {
        if self.panic_on.lock().unwrap().as_deref() == Some(symbol) {
            panic!("corrupt market data for {}", symbol);
        }
        self.candles
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .ok_or_else(|| AlertError::Api {
                code: 10001,
                message: format!("unknown symbol {}", symbol),
            })
    }
}

/// Captures every message; optionally fails delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        self.messages.lock().unwrap().push(message.to_string());
        if self.fail {
            return Err(AlertError::Notification("channel down".into()));
        }
        Ok(())
    }
}
