//! Indicator implementations backing the indicator feed.
//!
//! Indicators are pure functions: bar history in, numeric series out. They are
//! computed once over the whole series and then queried by bar index.

pub mod atr;
pub mod ema;
pub mod supertrend;

pub use atr::Atr;
pub use ema::Ema;
pub use supertrend::{Supertrend, SupertrendSeries};

use crate::domain::BarSnapshot;

/// A single-series indicator.
///
/// The output has the same length as the input and the first `lookback()`
/// values are `f64::NAN`. No value at bar t may depend on bars after t.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_100").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    fn compute(&self, bars: &[BarSnapshot]) -> Vec<f64>;
}

/// Synthetic bars from close prices: open = previous close, high/low one unit
/// outside the body.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<BarSnapshot> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2025, 10, 7, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            BarSnapshot {
                index: i,
                timestamp: base + chrono::Duration::minutes(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
            }
        })
        .collect()
}

/// Bars from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<BarSnapshot> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2025, 10, 7, 0, 0, 0).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| BarSnapshot {
            index: i,
            timestamp: base + chrono::Duration::minutes(i as i64),
            open,
            high,
            low,
            close,
        })
        .collect()
}

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
