//! Average True Range with Wilder smoothing.
//!
//! TR[t] = max(high-low, |high-close[t-1]|, |low-close[t-1]|). The first bar
//! has no previous close and contributes nothing, so the seed (mean of the
//! first `period` true ranges) lands on index `period`.

use super::Indicator;
use crate::domain::BarSnapshot;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[BarSnapshot]) -> Vec<f64> {
        let mut state = AtrState::new(self.period);
        bars.iter()
            .map(|bar| state.update(bar).unwrap_or(f64::NAN))
            .collect()
    }
}

pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}

/// Wilder smoothing (alpha = 1/period), seeded with a simple mean.
#[derive(Debug, Clone)]
pub struct WilderState {
    period: usize,
    seed_sum: f64,
    seen: usize,
    value: Option<f64>,
}

impl WilderState {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Wilder period must be >= 1");
        Self {
            period,
            seed_sum: 0.0,
            seen: 0,
            value: None,
        }
    }

    /// Feed one value. A NaN resets the seed window.
    pub fn update(&mut self, x: f64) -> Option<f64> {
        if x.is_nan() {
            *self = Self::new(self.period);
            return None;
        }
        let p = self.period as f64;
        self.value = match self.value {
            Some(prev) => Some(prev + (x - prev) / p),
            None => {
                self.seed_sum += x;
                self.seen += 1;
                (self.seen == self.period).then(|| self.seed_sum / p)
            }
        };
        self.value
    }
}

/// Incremental ATR over full bars.
#[derive(Debug, Clone)]
pub struct AtrState {
    prev_close: Option<f64>,
    smoother: WilderState,
}

impl AtrState {
    pub fn new(period: usize) -> Self {
        Self {
            prev_close: None,
            smoother: WilderState::new(period),
        }
    }

    pub fn update(&mut self, bar: &BarSnapshot) -> Option<f64> {
        let out = match self.prev_close {
            Some(pc) => self.smoother.update(true_range(bar.high, bar.low, pc)),
            None => None,
        };
        self.prev_close = if bar.close.is_nan() { None } else { Some(bar.close) };
        out
    }
}
