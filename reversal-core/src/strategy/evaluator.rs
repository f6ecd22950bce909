//! Signal evaluator: the pure decision function.
//!
//! Long entry needs all four, strictly:
//! 1. trend at the closed bar is Up
//! 2. fast average > slow average at the closed bar
//! 3. closed bar's low < slow average (pullback into the uptrend)
//! 4. forming bar close > forming bar open
//!
//! Short entry is the mirror image using the closed bar's high. Exits depend
//! on the trend side alone: Down exits longs, Up exits shorts.

use super::decision::{Decision, EntrySignal, ExitSignal};
use crate::domain::{BarSnapshot, FormingBar, IndicatorSnapshot, TrendDirection};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EvaluationError {
    #[error("indicator snapshot for bar {indicators} paired with bar {bar}")]
    Misaligned { bar: usize, indicators: usize },

    #[error("forming bar {forming} does not follow closed bar {closed}")]
    NotConsecutive { closed: usize, forming: usize },
}

/// Stateless: the same inputs always produce the same decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalEvaluator;

impl SignalEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate the rule for the bar after `previous`.
    ///
    /// Misaligned inputs are an error; the bar must be skipped, not guessed.
    /// Indicators that are not yet warm give an idle decision.
    pub fn evaluate(
        &self,
        previous: &BarSnapshot,
        current: &FormingBar,
        indicators: &IndicatorSnapshot,
    ) -> Result<Decision, EvaluationError> {
        if indicators.index != previous.index {
            return Err(EvaluationError::Misaligned {
                bar: previous.index,
                indicators: indicators.index,
            });
        }
        if current.index != previous.index + 1 {
            return Err(EvaluationError::NotConsecutive {
                closed: previous.index,
                forming: current.index,
            });
        }

        if !indicators.is_ready() || previous.is_void() || current.open.is_nan() || current.close.is_nan() {
            debug!(bar = previous.index, "inputs not ready, holding");
            return Ok(Decision::idle());
        }

        let long = long_entry(previous, current, indicators);
        let short = short_entry(previous, current, indicators);

        let entry = match (long, short) {
            (true, false) => EntrySignal::OpenLong,
            (false, true) => EntrySignal::OpenShort,
            (false, false) => EntrySignal::NoNewEntry,
            (true, true) => {
                warn!(
                    bar = previous.index,
                    trend = ?indicators.trend,
                    "long and short entry both fired, taking no entry"
                );
                EntrySignal::NoNewEntry
            }
        };

        Ok(Decision {
            entry,
            exit: ExitSignal::from_trend(indicators.trend),
        })
    }
}

fn long_entry(previous: &BarSnapshot, current: &FormingBar, ind: &IndicatorSnapshot) -> bool {
    ind.trend == TrendDirection::Up
        && ind.fast_average > ind.slow_average
        && previous.low < ind.slow_average
        && current.is_bullish()
}

fn short_entry(previous: &BarSnapshot, current: &FormingBar, ind: &IndicatorSnapshot) -> bool {
    ind.trend == TrendDirection::Down
        && ind.fast_average < ind.slow_average
        && previous.high > ind.slow_average
        && current.is_bearish()
}
