//! Prometheus metrics for the polling worker and its HTTP surface.

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub cycles_total: IntCounter,
    pub cycle_failures_total: IntCounter,
    pub cycle_duration_seconds: Histogram,
    pub last_cycle_timestamp: Gauge,
    pub evaluations_total: IntCounter,
    pub verdicts_total: IntCounterVec,
    pub alerts_emitted_total: IntCounter,
    pub alerts_suppressed_total: IntCounter,
    pub fetch_failures_total: IntCounter,
    pub notification_failures_total: IntCounter,
    pub tracked_symbols: IntGauge,
    pub http_requests_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles_total = IntCounter::new("polling_cycles_total", "Polling cycles started")?;
        let cycle_failures_total = IntCounter::new(
            "polling_cycle_failures_total",
            "Polling cycles that ended in a back-off",
        )?;
        let cycle_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("polling_cycle_duration_seconds", "Wall time of one polling cycle")
                .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        )?;
        let last_cycle_timestamp = Gauge::new(
            "polling_last_cycle_timestamp_seconds",
            "Unix time the last polling cycle finished",
        )?;
        let evaluations_total =
            IntCounter::new("signal_evaluations_total", "Instruments evaluated")?;
        let verdicts_total = IntCounterVec::new(
            Opts::new("signal_verdicts_total", "Confluence verdicts produced"),
            &["direction"],
        )?;
        let alerts_emitted_total =
            IntCounter::new("alerts_emitted_total", "Alerts that passed deduplication")?;
        let alerts_suppressed_total =
            IntCounter::new("alerts_suppressed_total", "Alerts dropped as duplicates")?;
        let fetch_failures_total = IntCounter::new(
            "market_data_fetch_failures_total",
            "Instruments skipped because market data was unavailable",
        )?;
        let notification_failures_total = IntCounter::new(
            "notification_failures_total",
            "Alerts the notifier failed to deliver",
        )?;
        let tracked_symbols = IntGauge::new("tracked_symbols", "Configured instruments")?;
        let http_requests_total =
            IntCounter::new("http_requests_total", "HTTP requests served")?;

        registry.register(Box::new(cycles_total.clone()))?;
        registry.register(Box::new(cycle_failures_total.clone()))?;
        registry.register(Box::new(cycle_duration_seconds.clone()))?;
        registry.register(Box::new(last_cycle_timestamp.clone()))?;
        registry.register(Box::new(evaluations_total.clone()))?;
        registry.register(Box::new(verdicts_total.clone()))?;
        registry.register(Box::new(alerts_emitted_total.clone()))?;
        registry.register(Box::new(alerts_suppressed_total.clone()))?;
        registry.register(Box::new(fetch_failures_total.clone()))?;
        registry.register(Box::new(notification_failures_total.clone()))?;
        registry.register(Box::new(tracked_symbols.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;

        Ok(Self {
            registry,
            cycles_total,
            cycle_failures_total,
            cycle_duration_seconds,
            last_cycle_timestamp,
            evaluations_total,
            verdicts_total,
            alerts_emitted_total,
            alerts_suppressed_total,
            fetch_failures_total,
            notification_failures_total,
            tracked_symbols,
            http_requests_total,
        })
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
