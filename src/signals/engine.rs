//! Confluence evaluation: turns a price series into a BUY/SELL verdict when
//! enough independent conditions agree.

use chrono::Utc;
use tracing::debug;

use crate::config::SignalParams;
use crate::indicators::{calculate_rsi, calculate_sma, volume_multiplier};
use crate::models::indicators::{IndicatorSet, PriceSeries};
use crate::models::signal::{Condition, SignalDirection, Verdict};

/// Placeholder confidence attached to every verdict.
pub const PLACEHOLDER_CONFIDENCE: u8 = 70;

/// Candles required with the default periods.
pub const MIN_CANDLES: usize = 21;

/// Which conditions held for one direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionTally {
    pub rsi_extreme: bool,
    pub trend_aligned: bool,
    pub volume_surge: bool,
}

impl ConditionTally {
    pub fn count(&self) -> u8 {
        [self.rsi_extreme, self.trend_aligned, self.volume_surge]
            .iter()
            .filter(|met| **met)
            .count() as u8
    }

    pub fn met(&self) -> Vec<Condition> {
        let mut met = Vec::with_capacity(3);
        if self.rsi_extreme {
            met.push(Condition::RsiExtreme);
        }
        if self.trend_aligned {
            met.push(Condition::TrendAligned);
        }
        if self.volume_surge {
            met.push(Condition::VolumeSurge);
        }
        met
    }
}

pub struct ConfluenceEvaluator {
    params: SignalParams,
}

impl Default for ConfluenceEvaluator {
    fn default() -> Self {
        Self::new(SignalParams::default())
    }
}

impl ConfluenceEvaluator {
    pub fn new(params: SignalParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SignalParams {
        &self.params
    }

    /// Compute the indicator readings for `series`, or `None` if it is too short.
    pub fn indicators(&self, series: &PriceSeries) -> Option<IndicatorSet> {
        if series.len() < self.params.min_candles() {
            return None;
        }

        let closes = series.closes();
        let volumes = series.volumes();

        Some(IndicatorSet {
            price: *closes.last()?,
            rsi: calculate_rsi(&closes, self.params.rsi_period),
            ema_fast: calculate_sma(&closes, self.params.ema_fast_period)?,
            ema_slow: calculate_sma(&closes, self.params.ema_slow_period)?,
            volume_multiplier: volume_multiplier(&volumes, self.params.volume_window),
        })
    }

    /// Tally the BUY and SELL conditions for a set of readings.
    ///
    /// An undefined RSI fails the RSI condition in both directions.
    pub fn tally(&self, ind: &IndicatorSet) -> (ConditionTally, ConditionTally) {
        let surge = ind.volume_multiplier >= self.params.volume_surge_threshold;

        let buy = ConditionTally {
            rsi_extreme: ind.rsi.is_some_and(|r| r < self.params.rsi_oversold),
            trend_aligned: ind.ema_fast > ind.ema_slow,
            volume_surge: surge,
        };
        let sell = ConditionTally {
            rsi_extreme: ind.rsi.is_some_and(|r| r > self.params.rsi_overbought),
            trend_aligned: ind.ema_fast < ind.ema_slow,
            volume_surge: surge,
        };

        (buy, sell)
    }

    /// Evaluate `series` and return a verdict if either direction reaches the
    /// condition threshold.
    ///
    /// If both directions qualify the one with more conditions met wins; a tie
    /// goes to BUY.
    pub fn evaluate(&self, series: &PriceSeries) -> Option<Verdict> {
        let Some(ind) = self.indicators(series) else {
            debug!(
                symbol = %series.symbol(),
                count = series.len(),
                min = self.params.min_candles(),
                "not enough candles to evaluate"
            );
            return None;
        };

        let (buy, sell) = self.tally(&ind);
        let threshold = self.params.condition_threshold;

        let (direction, tally) = match (buy.count() >= threshold, sell.count() >= threshold) {
            (true, true) if sell.count() > buy.count() => (SignalDirection::Sell, sell),
            (true, _) => (SignalDirection::Buy, buy),
            (false, true) => (SignalDirection::Sell, sell),
            (false, false) => {
                debug!(
                    symbol = %series.symbol(),
                    buy = buy.count(),
                    sell = sell.count(),
                    rsi = ?ind.rsi,
                    vol_mult = ind.volume_multiplier,
                    "no confluence"
                );
                return None;
            }
        };

        Some(Verdict {
            symbol: series.symbol().to_string(),
            direction,
            price: ind.price,
            rsi: ind.rsi,
            ema_fast: ind.ema_fast,
            ema_slow: ind.ema_slow,
            volume_multiplier: ind.volume_multiplier,
            conditions_met: tally.count(),
            conditions: tally.met(),
            confidence: PLACEHOLDER_CONFIDENCE,
            timestamp: Utc::now(),
        })
    }
}
