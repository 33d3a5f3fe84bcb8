//! Confluence alert worker
//!
//! Polls market data for the configured symbols and pushes confluence alerts
//! to Telegram (or the log when no credentials are set).

use confluex::config::{self, Config};
use confluex::core::http::start_server;
use confluex::core::scheduler::PollingScheduler;
use confluex::logging;
use confluex::metrics::Metrics;
use confluex::services::bybit::BybitMarketDataProvider;
use confluex::services::market_data::MarketDataProvider;
use confluex::services::notifier::{LogNotifier, Notifier, TelegramNotifier};
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    info!(environment = %config::get_environment(), "Starting confluence alert worker");
    info!(
        symbols = ?config.symbols,
        interval_s = config.interval_seconds,
        backoff_s = config.retry_backoff_seconds,
        kline = %config.kline_interval,
        dedup = ?config.dedup_policy,
        "Configuration loaded"
    );

    let metrics = Arc::new(Metrics::new()?);

    let provider: Arc<dyn MarketDataProvider> =
        Arc::new(BybitMarketDataProvider::with_base_url(&config.bybit_base_url)?);

    let notifier: Arc<dyn Notifier> = match &config.telegram {
        Some(telegram) => {
            info!("Telegram notifier enabled");
            Arc::new(TelegramNotifier::new(telegram)?)
        }
        None => {
            warn!("TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set - alerts will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let server_handle = if config.http_port > 0 {
        let port = config.http_port;
        let metrics = metrics.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = start_server(port, metrics).await {
                error!(error = %e, "HTTP server stopped");
            }
        }))
    } else {
        None
    };

    let scheduler = PollingScheduler::new(&config, provider, notifier).with_metrics(metrics);
    scheduler.announce_start().await;

    tokio::select! {
        _ = scheduler.run() => {}
        _ = signal::ctrl_c() => {
            info!("Shutting down worker...");
        }
    }

    if let Some(handle) = server_handle {
        handle.abort();
    }
    info!("Worker stopped");
    Ok(())
}
