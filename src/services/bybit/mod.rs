//! Bybit linear-perpetual market data over the public REST API

pub mod messages;
pub mod provider;

pub use provider::BybitMarketDataProvider;
