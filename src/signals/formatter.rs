//! Alert rendering with fixed take-profit / stop-loss offsets

use crate::models::signal::{SignalDirection, Verdict};

/// Take-profit and stop-loss prices derived from the entry price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeLevels {
    pub tp1: f64,
    pub tp2: f64,
    pub sl: f64,
}

impl TradeLevels {
    pub fn for_direction(direction: SignalDirection, price: f64) -> Self {
        match direction {
            SignalDirection::Buy => Self {
                tp1: price * 1.025,
                tp2: price * 1.058,
                sl: price * 0.98,
            },
            SignalDirection::Sell => Self {
                tp1: price * 0.975,
                tp2: price * 0.942,
                sl: price * 1.02,
            },
        }
    }
}

/// Render a verdict as a Telegram HTML message.
///
/// TP2 is part of [`TradeLevels`] but is not printed.
pub fn format_alert(verdict: &Verdict) -> String {
    let levels = TradeLevels::for_direction(verdict.direction, verdict.price);
    let marker = match verdict.direction {
        SignalDirection::Buy => "🟢",
        SignalDirection::Sell => "🔴",
    };
    let rsi = verdict
        .rsi
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "{marker} <b>{direction}</b>\n{symbol} @ {price:.8}\nRSI: {rsi}\n📈 TP1: {tp1:.8}\n🛑 SL: {sl:.8}\n{time}",
        direction = verdict.direction,
        symbol = verdict.symbol,
        price = verdict.price,
        tp1 = levels.tp1,
        sl = levels.sl,
        time = verdict.timestamp.format("%H:%M:%S UTC"),
    )
}

/// Message sent once when the worker comes up.
pub fn format_startup(symbol_count: usize, interval_label: &str) -> String {
    format!(
        "🚀 <b>Trading Bot started!</b>\n📊 Confluence ({}) on {} symbols",
        interval_label, symbol_count
    )
}
