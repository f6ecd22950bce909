//! Indicator-side view of a bar: trend side and the two moving averages.

use serde::{Deserialize, Serialize};

/// Binary side reported by the volatility-band trend-flip indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
}

impl TrendDirection {
    pub fn opposite(&self) -> Self {
        match self {
            TrendDirection::Up => TrendDirection::Down,
            TrendDirection::Down => TrendDirection::Up,
        }
    }
}

/// Indicator values at one closed bar.
///
/// `index` must equal the index of the [`BarSnapshot`](super::BarSnapshot)
/// the values are paired with; the evaluator refuses mismatched pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub index: usize,
    pub trend: TrendDirection,
    pub fast_average: f64,
    pub slow_average: f64,
}

impl IndicatorSnapshot {
    /// Both averages are finite numbers (indicator warm-up finished).
    pub fn is_ready(&self) -> bool {
        self.fast_average.is_finite() && self.slow_average.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_average_is_not_ready() {
        let snap = IndicatorSnapshot {
            index: 0,
            trend: TrendDirection::Up,
            fast_average: 1.21,
            slow_average: f64::NAN,
        };
        assert!(!snap.is_ready());
    }

    #[test]
    fn trend_opposite() {
        assert_eq!(TrendDirection::Up.opposite(), TrendDirection::Down);
    }
}
