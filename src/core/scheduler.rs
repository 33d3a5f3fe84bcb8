//! Fixed-interval polling loop: fetch, evaluate, deduplicate, notify.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::FutureExt;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::AlertError;
use crate::metrics::Metrics;
use crate::models::indicators::{KlineInterval, PriceSeries};
use crate::services::market_data::MarketDataProvider;
use crate::services::notifier::Notifier;
use crate::signals::dedup::{Deduplicator, SignalMemory};
use crate::signals::engine::ConfluenceEvaluator;
use crate::signals::formatter::{format_alert, format_startup};

/// What happened to one instrument during a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolOutcome {
    FetchFailed,
    InvalidSeries,
    NoSignal,
    Suppressed,
    Emitted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub evaluated: usize,
    pub fetch_failures: usize,
    pub invalid_series: usize,
    pub verdicts: usize,
    pub emitted: usize,
    pub suppressed: usize,
}

impl CycleReport {
    fn record(&mut self, outcome: SymbolOutcome) {
        match outcome {
            SymbolOutcome::FetchFailed => self.fetch_failures += 1,
            SymbolOutcome::InvalidSeries => self.invalid_series += 1,
            SymbolOutcome::NoSignal => self.evaluated += 1,
            SymbolOutcome::Suppressed => {
                self.evaluated += 1;
                self.verdicts += 1;
                self.suppressed += 1;
            }
            SymbolOutcome::Emitted => {
                self.evaluated += 1;
                self.verdicts += 1;
                self.emitted += 1;
            }
        }
    }
}

/// Owns the per-process signal memory and drives every instrument through the
/// confluence pipeline once per interval.
pub struct PollingScheduler {
    symbols: Vec<String>,
    interval: Duration,
    retry_backoff: Duration,
    kline_interval: KlineInterval,
    kline_limit: usize,
    provider: Arc<dyn MarketDataProvider>,
    notifier: Arc<dyn Notifier>,
    evaluator: ConfluenceEvaluator,
    dedup: Deduplicator,
    memory: SignalMemory,
    metrics: Option<Arc<Metrics>>,
}

impl PollingScheduler {
    pub fn new(
        config: &Config,
        provider: Arc<dyn MarketDataProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            symbols: config.symbols.clone(),
            interval: Duration::from_secs(config.interval_seconds),
            retry_backoff: Duration::from_secs(config.retry_backoff_seconds),
            kline_interval: config.kline_interval,
            kline_limit: config.kline_limit,
            provider,
            notifier,
            evaluator: ConfluenceEvaluator::new(config.signal.clone()),
            dedup: Deduplicator::new(config.dedup_policy),
            memory: SignalMemory::new(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        metrics.tracked_symbols.set(self.symbols.len() as i64);
        self.metrics = Some(metrics);
        self
    }

    pub fn memory(&self) -> &SignalMemory {
        &self.memory
    }

    /// Send the startup banner. Delivery failure is logged only.
    pub async fn announce_start(&self) {
        let message = format_startup(self.symbols.len(), &self.kline_interval.label());
        if let Err(e) = self.notifier.send(&message).await {
            warn!(error = %e, "failed to deliver startup message");
        }
    }

    /// Run one pass over all instruments.
    ///
    /// Per-instrument problems are logged and skipped. The cycle only fails
    /// when no instrument could be fetched at all.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, AlertError> {
        let started = Instant::now();
        if let Some(m) = &self.metrics {
            m.cycles_total.inc();
        }

        let mut report = CycleReport::default();
        let symbols = self.symbols.clone();
        for symbol in &symbols {
            let outcome = self.process_symbol(symbol).await;
            report.record(outcome);
        }

        if let Some(m) = &self.metrics {
            m.cycle_duration_seconds
                .observe(started.elapsed().as_secs_f64());
            m.last_cycle_timestamp.set(Utc::now().timestamp() as f64);
        }

        info!(
            symbols = symbols.len(),
            evaluated = report.evaluated,
            verdicts = report.verdicts,
            emitted = report.emitted,
            suppressed = report.suppressed,
            fetch_failures = report.fetch_failures,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "polling cycle complete"
        );

        if !symbols.is_empty() && report.fetch_failures == symbols.len() {
            return Err(AlertError::Cycle(format!(
                "market data unavailable for all {} symbols",
                symbols.len()
            )));
        }
        Ok(report)
    }

    /// [`run_cycle`](Self::run_cycle) behind a panic boundary. A panic anywhere
    /// in the cycle comes back as [`AlertError::Cycle`].
    pub async fn run_guarded_cycle(&mut self) -> Result<CycleReport, AlertError> {
        match AssertUnwindSafe(self.run_cycle()).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(AlertError::Cycle(format!(
                "polling cycle panicked: {}",
                panic_message(payload.as_ref())
            ))),
        }
    }

    async fn process_symbol(&mut self, symbol: &str) -> SymbolOutcome {
        let candles = match self
            .provider
            .get_candles(symbol, self.kline_interval, self.kline_limit)
            .await
        {
            Ok(candles) => candles,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "market data fetch failed, skipping");
                if let Some(m) = &self.metrics {
                    m.fetch_failures_total.inc();
                }
                return SymbolOutcome::FetchFailed;
            }
        };

        let series = match PriceSeries::contiguous(symbol, candles, self.kline_interval) {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "discarding malformed candle series");
                return SymbolOutcome::InvalidSeries;
            }
        };

        if let Some(m) = &self.metrics {
            m.evaluations_total.inc();
        }

        let Some(verdict) = self.evaluator.evaluate(&series) else {
            return SymbolOutcome::NoSignal;
        };

        if let Some(m) = &self.metrics {
            m.verdicts_total
                .with_label_values(&[verdict.direction.as_str()])
                .inc();
        }

        if !self.dedup.should_emit(&mut self.memory, &verdict) {
            debug!(
                symbol = %symbol,
                direction = %verdict.direction,
                "duplicate signal suppressed"
            );
            if let Some(m) = &self.metrics {
                m.alerts_suppressed_total.inc();
            }
            return SymbolOutcome::Suppressed;
        }

        info!(
            symbol = %symbol,
            direction = %verdict.direction,
            price = verdict.price,
            rsi = ?verdict.rsi,
            ema_fast = verdict.ema_fast,
            ema_slow = verdict.ema_slow,
            vol_mult = verdict.volume_multiplier,
            conditions = verdict.conditions_met,
            "confluence signal"
        );
        if let Some(m) = &self.metrics {
            m.alerts_emitted_total.inc();
        }

        let message = format_alert(&verdict);
        if let Err(e) = self.notifier.send(&message).await {
            error!(symbol = %symbol, error = %e, "failed to deliver alert");
            if let Some(m) = &self.metrics {
                m.notification_failures_total.inc();
            }
        }

        SymbolOutcome::Emitted
    }

    /// Poll forever. A failed or panicked cycle is followed by the shorter
    /// back-off delay instead of the regular interval.
    pub async fn run(mut self) {
        info!(
            symbols = self.symbols.len(),
            interval_s = self.interval.as_secs(),
            kline = %self.kline_interval,
            "polling scheduler started"
        );

        loop {
            let delay = match self.run_guarded_cycle().await {
                Ok(_) => self.interval,
                Err(e) => {
                    error!(
                        error = %e,
                        backoff_s = self.retry_backoff.as_secs(),
                        "polling cycle failed, backing off"
                    );
                    if let Some(m) = &self.metrics {
                        m.cycle_failures_total.inc();
                    }
                    self.retry_backoff
                }
            };
            tokio::time::sleep(delay).await;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
