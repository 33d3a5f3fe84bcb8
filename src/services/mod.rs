//! External collaborators: market data in, notifications out.

pub mod bybit;
pub mod market_data;
pub mod notifier;

pub use bybit::BybitMarketDataProvider;
pub use market_data::MarketDataProvider;
pub use notifier::{LogNotifier, Notifier, TelegramNotifier};
