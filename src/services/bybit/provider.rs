//! Bybit market data provider implementation

use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, warn};

use super::messages::{parse_kline_row, KlineResponse};
use crate::config::DEFAULT_BYBIT_URL;
use crate::error::AlertError;
use crate::models::indicators::{Candle, KlineInterval};
use crate::services::market_data::MarketDataProvider;

const KLINE_PATH: &str = "/v5/market/kline";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_LIMIT: usize = 1000;

pub struct BybitMarketDataProvider {
    base_url: String,
    client: reqwest::Client,
    max_retries: usize,
    retry_delay: Duration,
}

impl BybitMarketDataProvider {
    pub fn new() -> Result<Self, AlertError> {
        Self::with_base_url(DEFAULT_BYBIT_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, AlertError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
        }
    }

    /// Override the retry budget for transient transport failures.
    pub fn with_retries(mut self, max_retries: usize, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.retry_delay)
            .with_max_times(self.max_retries)
    }

    async fn fetch_rows(
        &self,
        symbol: &str,
        interval: KlineInterval,
        limit: usize,
    ) -> Result<Vec<Vec<String>>, AlertError> {
        let url = format!("{}{}", self.base_url, KLINE_PATH);
        let interval_param = interval.as_str();
        let limit_param = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("category", "linear"),
                ("symbol", symbol),
                ("interval", interval_param.as_str()),
                ("limit", limit_param.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: KlineResponse = response.json().await?;
        if body.ret_code != 0 {
            return Err(AlertError::Api {
                code: body.ret_code,
                message: body.ret_msg,
            });
        }

        Ok(body.result.map(|r| r.list).unwrap_or_default())
    }
}

/// Sort ascending, drop duplicate buckets and any bucket that has not closed
/// by `now`, then keep the newest `limit`.
pub fn closed_candles(
    mut candles: Vec<Candle>,
    interval: KlineInterval,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<Candle> {
    candles.sort_by_key(|c| c.timestamp);
    candles.dedup_by_key(|c| c.timestamp);

    let step = interval.duration();
    candles.retain(|c| {
        c.timestamp
            .checked_add_signed(step)
            .is_some_and(|end| end <= now)
    });

    if candles.len() > limit {
        candles.drain(..candles.len() - limit);
    }
    candles
}

#[async_trait::async_trait]
impl MarketDataProvider for BybitMarketDataProvider {
    async fn get_candles(
        &self,
        symbol: &str,
        interval: KlineInterval,
        limit: usize,
    ) -> Result<Vec<Candle>, AlertError> {
        // One extra row: the newest bucket is normally still open.
        let request_limit = (limit + 1).min(MAX_LIMIT);

        let rows = (|| self.fetch_rows(symbol, interval, request_limit))
            .retry(self.backoff())
            .when(|e: &AlertError| e.is_transient())
            .notify(|e: &AlertError, delay: Duration| {
                warn!(
                    symbol = %symbol,
                    error = %e,
                    retry_in_ms = delay.as_millis() as u64,
                    "kline request failed, retrying"
                );
            })
            .await?;

        let candles = rows
            .iter()
            .map(|row| parse_kline_row(row))
            .collect::<Result<Vec<_>, _>>()?;

        let candles = closed_candles(candles, interval, limit, Utc::now());
        debug!(
            symbol = %symbol,
            interval = %interval,
            count = candles.len(),
            "fetched closed candles"
        );
        Ok(candles)
    }
}
