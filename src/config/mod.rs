//! Runtime configuration loaded from the environment (and `.env` via dotenvy).

use crate::error::AlertError;
use crate::models::indicators::KlineInterval;
use crate::signals::dedup::FingerprintPolicy;
use std::env;
use std::str::FromStr;

pub const DEFAULT_SYMBOLS: [&str; 20] = [
    "1000PEPEUSDT",
    "AVAXUSDT",
    "1000BONKUSDT",
    "ENAUSDT",
    "LDOUSDT",
    "ZEREBROUSDT",
    "1000RATSUSDT",
    "NEARUSDT",
    "TRBUSDT",
    "APTUSDT",
    "BLURUSDT",
    "WLDUSDT",
    "ARBUSDT",
    "1000FLOKIUSDT",
    "MAGICUSDT",
    "JUPUSDT",
    "LTCUSDT",
    "LINKUSDT",
    "FILUSDT",
    "MASKUSDT",
];

pub const DEFAULT_BYBIT_URL: &str = "https://api.bybit.com";
pub const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org";

/// Get the deployment environment name (`APP_ENV`, defaults to "sandbox")
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Indicator periods and decision thresholds used by the confluence evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    pub rsi_period: usize,
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    pub volume_window: usize,
    pub volume_surge_threshold: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub condition_threshold: u8,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ema_fast_period: 9,
            ema_slow_period: 21,
            volume_window: 5,
            volume_surge_threshold: 2.0,
            rsi_oversold: 25.0,
            rsi_overbought: 75.0,
            condition_threshold: 3,
        }
    }
}

impl SignalParams {
    /// Smallest series length every indicator can be computed from.
    pub fn min_candles(&self) -> usize {
        self.ema_slow_period
            .max(self.rsi_period + 1)
            .max(self.volume_window)
    }

    pub fn validate(&self) -> Result<(), AlertError> {
        if self.rsi_period == 0 || self.ema_fast_period == 0 || self.volume_window == 0 {
            return Err(AlertError::Config("indicator periods must be > 0".into()));
        }
        if self.ema_fast_period >= self.ema_slow_period {
            return Err(AlertError::Config(format!(
                "fast period ({}) must be shorter than slow period ({})",
                self.ema_fast_period, self.ema_slow_period
            )));
        }
        if !(1..=3).contains(&self.condition_threshold) {
            return Err(AlertError::Config(format!(
                "condition threshold must be between 1 and 3, got {}",
                self.condition_threshold
            )));
        }
        if !self.volume_surge_threshold.is_finite() || self.volume_surge_threshold <= 0.0 {
            return Err(AlertError::Config("volume surge threshold must be positive".into()));
        }
        if !(0.0..=100.0).contains(&self.rsi_oversold)
            || !(0.0..=100.0).contains(&self.rsi_overbought)
            || self.rsi_oversold >= self.rsi_overbought
        {
            return Err(AlertError::Config(format!(
                "invalid RSI bands: oversold {} / overbought {}",
                self.rsi_oversold, self.rsi_overbought
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub symbols: Vec<String>,
    pub interval_seconds: u64,
    pub retry_backoff_seconds: u64,
    pub kline_interval: KlineInterval,
    pub kline_limit: usize,
    pub signal: SignalParams,
    pub dedup_policy: FingerprintPolicy,
    pub bybit_base_url: String,
    pub telegram: Option<TelegramConfig>,
    pub http_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            interval_seconds: 300,
            retry_backoff_seconds: 60,
            kline_interval: KlineInterval::Minutes(15),
            kline_limit: 50,
            signal: SignalParams::default(),
            dedup_policy: FingerprintPolicy::default(),
            bybit_base_url: DEFAULT_BYBIT_URL.to_string(),
            telegram: None,
            http_port: 0,
        }
    }
}

impl Config {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, AlertError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AlertError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let sig = &defaults.signal;

        let symbols = match lookup("SYMBOLS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.symbols.clone(),
        };

        let kline_interval = match lookup("KLINE_INTERVAL") {
            Some(raw) => raw.parse::<KlineInterval>()?,
            None => defaults.kline_interval,
        };

        let dedup_policy = match lookup("DEDUP_POLICY") {
            Some(raw) => raw.parse::<FingerprintPolicy>()?,
            None => defaults.dedup_policy,
        };

        let telegram = match (lookup("TELEGRAM_BOT_TOKEN"), lookup("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) if !bot_token.is_empty() && !chat_id.is_empty() => {
                Some(TelegramConfig {
                    bot_token,
                    chat_id,
                    base_url: lookup("TELEGRAM_BASE_URL")
                        .unwrap_or_else(|| DEFAULT_TELEGRAM_URL.to_string()),
                })
            }
            _ => None,
        };

        let config = Config {
            symbols,
            interval_seconds: parse_or(&lookup, "CHECK_INTERVAL_SECONDS", defaults.interval_seconds)?,
            retry_backoff_seconds: parse_or(
                &lookup,
                "RETRY_BACKOFF_SECONDS",
                defaults.retry_backoff_seconds,
            )?,
            kline_interval,
            kline_limit: parse_or(&lookup, "KLINE_LIMIT", defaults.kline_limit)?,
            signal: SignalParams {
                rsi_period: parse_or(&lookup, "RSI_PERIOD", sig.rsi_period)?,
                ema_fast_period: parse_or(&lookup, "EMA_FAST_PERIOD", sig.ema_fast_period)?,
                ema_slow_period: parse_or(&lookup, "EMA_SLOW_PERIOD", sig.ema_slow_period)?,
                volume_window: parse_or(&lookup, "VOLUME_WINDOW", sig.volume_window)?,
                volume_surge_threshold: parse_or(
                    &lookup,
                    "VOLUME_SURGE_THRESHOLD",
                    sig.volume_surge_threshold,
                )?,
                rsi_oversold: parse_or(&lookup, "RSI_OVERSOLD", sig.rsi_oversold)?,
                rsi_overbought: parse_or(&lookup, "RSI_OVERBOUGHT", sig.rsi_overbought)?,
                condition_threshold: parse_or(
                    &lookup,
                    "CONDITION_THRESHOLD",
                    sig.condition_threshold,
                )?,
            },
            dedup_policy,
            bybit_base_url: lookup("BYBIT_BASE_URL").unwrap_or(defaults.bybit_base_url),
            telegram,
            http_port: parse_or(&lookup, "HTTP_PORT", defaults.http_port)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlertError> {
        if self.symbols.is_empty() {
            return Err(AlertError::Config("symbol list is empty".into()));
        }
        if self.interval_seconds == 0 || self.retry_backoff_seconds == 0 {
            return Err(AlertError::Config(
                "polling and back-off intervals must be > 0".into(),
            ));
        }
        self.signal.validate()?;
        if self.kline_limit < self.signal.min_candles() {
            return Err(AlertError::Config(format!(
                "kline limit {} is below the {} candles an evaluation needs",
                self.kline_limit,
                self.signal.min_candles()
            )));
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AlertError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AlertError::Config(format!("{} has an invalid value: {:?}", key, raw))),
        None => Ok(default),
    }
}
