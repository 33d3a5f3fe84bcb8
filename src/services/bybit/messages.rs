//! Bybit v5 REST payloads

use chrono::{TimeZone, Utc};
use serde::Deserialize;

use crate::error::AlertError;
use crate::models::indicators::Candle;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KlineResponse {
    pub ret_code: i64,
    #[serde(default)]
    pub ret_msg: String,
    #[serde(default)]
    pub result: Option<KlineResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KlineResult {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub list: Vec<Vec<String>>,
}

/// Parse one `[startTime, open, high, low, close, volume, turnover]` row.
pub fn parse_kline_row(row: &[String]) -> Result<Candle, AlertError> {
    if row.len() < 6 {
        return Err(AlertError::Parse(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }

    let start_ms: i64 = row[0]
        .parse()
        .map_err(|e| AlertError::Parse(format!("invalid start time {:?}: {}", row[0], e)))?;
    let timestamp = Utc
        .timestamp_millis_opt(start_ms)
        .single()
        .ok_or_else(|| AlertError::Parse(format!("start time out of range: {}", start_ms)))?;

    let field = |idx: usize, name: &str| -> Result<f64, AlertError> {
        row[idx]
            .parse::<f64>()
            .map_err(|e| AlertError::Parse(format!("invalid {} {:?}: {}", name, row[idx], e)))
    };

    Ok(Candle::new(
        field(1, "open")?,
        field(2, "high")?,
        field(3, "low")?,
        field(4, "close")?,
        field(5, "volume")?,
        timestamp,
    ))
}
