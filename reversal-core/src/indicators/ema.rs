//! Exponential moving average.
//!
//! EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seeded with the simple mean of the first `period` closes, so the first
//! valid value sits at index `period - 1`.

use super::Indicator;
use crate::domain::BarSnapshot;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[BarSnapshot]) -> Vec<f64> {
        let mut state = EmaState::new(self.period);
        bars.iter()
            .map(|bar| state.update(bar.close).unwrap_or(f64::NAN))
            .collect()
    }
}

/// Incremental EMA for hosts that receive one close at a time.
///
/// A NaN input poisons the state: every later update returns `None`.
#[derive(Debug, Clone)]
pub struct EmaState {
    period: usize,
    alpha: f64,
    seed_sum: f64,
    seen: usize,
    value: Option<f64>,
    poisoned: bool,
}

impl EmaState {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            seed_sum: 0.0,
            seen: 0,
            value: None,
            poisoned: false,
        }
    }

    pub fn update(&mut self, close: f64) -> Option<f64> {
        if self.poisoned || close.is_nan() {
            self.poisoned = true;
            self.value = None;
            return None;
        }

        self.seen += 1;
        self.value = match self.value {
            Some(prev) => Some(self.alpha * close + (1.0 - self.alpha) * prev),
            None => {
                self.seed_sum += close;
                (self.seen == self.period).then(|| self.seed_sum / self.period as f64)
            }
        };
        self.value
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}
