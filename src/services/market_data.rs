//! Market data provider interface.

use crate::error::AlertError;
use crate::models::indicators::{Candle, KlineInterval};

#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Most recent closed candles for `symbol`, oldest first, at most `limit`.
    async fn get_candles(
        &self,
        symbol: &str,
        interval: KlineInterval,
        limit: usize,
    ) -> Result<Vec<Candle>, AlertError>;
}
