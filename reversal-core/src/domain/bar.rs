//! Bar snapshots: the market data units the evaluator consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One completed price bar (time-based or Renko brick).
///
/// `index` is the bar's position in its feed. It is what ties a bar to the
/// indicator snapshot computed at the same bar, so it must survive any
/// re-slicing of the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarSnapshot {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl BarSnapshot {
    /// Returns true if any OHLC field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Returns true if every OHLC field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }

    /// OHLC sanity: finite prices, high >= low, high >= max(open, close),
    /// low <= min(open, close).
    pub fn is_sane(&self) -> bool {
        if !self.is_finite() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }

    pub fn validate(&self) -> Result<(), BarError> {
        if self.is_void() {
            return Err(BarError::Void { index: self.index });
        }
        if !self.is_finite() {
            return Err(BarError::NonFinite { index: self.index });
        }
        if !self.is_sane() {
            return Err(BarError::InconsistentRange {
                index: self.index,
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            });
        }
        Ok(())
    }

    /// The in-progress view of this bar: only its open and close-so-far.
    pub fn forming(&self) -> FormingBar {
        FormingBar {
            index: self.index,
            open: self.open,
            close: self.close,
        }
    }
}

/// The bar currently forming when a decision is taken.
///
/// Only open and close-so-far are exposed; high/low of an unfinished bar are
/// never consulted by the rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormingBar {
    pub index: usize,
    pub open: f64,
    pub close: f64,
}

impl FormingBar {
    /// Strictly bullish candle (close > open).
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Strictly bearish candle (close < open).
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {index} has NaN prices")]
    Void { index: usize },

    #[error("bar {index} has infinite prices")]
    NonFinite { index: usize },

    #[error("bar {index} has inconsistent range: open={open} high={high} low={low} close={close}")]
    InconsistentRange {
        index: usize,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },

    #[error("bar {index} timestamp does not advance past the previous bar")]
    NonMonotonicTimestamp { index: usize },
}

/// Check that a bar series is sane and strictly increasing in time.
pub fn validate_series(bars: &[BarSnapshot]) -> Result<(), BarError> {
    for (i, bar) in bars.iter().enumerate() {
        bar.validate()?;
        if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
            return Err(BarError::NonMonotonicTimestamp { index: bar.index });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_bar() -> BarSnapshot {
        BarSnapshot {
            index: 0,
            timestamp: Utc.with_ymd_and_hms(2025, 10, 7, 0, 0, 0).unwrap(),
            open: 1.1000,
            high: 1.1005,
            low: 1.0995,
            close: 1.1002,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
        assert!(sample_bar().validate().is_ok());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(bar.is_void());
        assert_eq!(bar.validate(), Err(BarError::Void { index: 0 }));
    }

    #[test]
    fn bar_rejects_infinite_prices() {
        let mut bar = sample_bar();
        bar.high = f64::INFINITY;
        bar.close = f64::INFINITY;
        assert!(!bar.is_void());
        assert!(!bar.is_sane());
        assert_eq!(bar.validate(), Err(BarError::NonFinite { index: 0 }));

        let mut bar = sample_bar();
        bar.low = f64::NEG_INFINITY;
        assert_eq!(bar.validate(), Err(BarError::NonFinite { index: 0 }));
    }

    #[test]
    fn bar_detects_high_below_close() {
        let mut bar = sample_bar();
        bar.high = 1.1001;
        assert!(!bar.is_sane());
        assert!(matches!(bar.validate(), Err(BarError::InconsistentRange { .. })));
    }

    #[test]
    fn forming_candle_direction_is_strict() {
        let mut bar = sample_bar();
        bar.close = bar.open;
        let forming = bar.forming();
        assert!(!forming.is_bullish());
        assert!(!forming.is_bearish());
    }

    #[test]
    fn series_rejects_repeated_timestamp() {
        let first = sample_bar();
        let mut second = sample_bar();
        second.index = 1;
        let err = validate_series(&[first, second]).unwrap_err();
        assert_eq!(err, BarError::NonMonotonicTimestamp { index: 1 });
    }
}
